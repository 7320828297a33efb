use crate::clock::LocalClock;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::AppData;
use crate::sessions::SessionPolicy;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub clock: LocalClock,
    pub policy: SessionPolicy,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(config: &Config, data: AppData) -> Self {
        Self {
            data_path: config.data_path.clone(),
            clock: config.clock,
            policy: SessionPolicy {
                single_open_session: config.single_open_session,
            },
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Runs `mutate` on a copy of the store, persists the copy and only then
    /// swaps it in. On any error the in-memory store is left as it was.
    pub async fn commit<T, E>(
        &self,
        mutate: impl FnOnce(&mut AppData) -> Result<T, E>,
    ) -> Result<T, AppError>
    where
        AppError: From<E>,
    {
        let mut data = self.data.lock().await;
        let mut draft = data.clone();
        let out = mutate(&mut draft)?;
        persist_data(&self.data_path, &draft).await?;
        *data = draft;
        Ok(out)
    }
}
