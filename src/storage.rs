use crate::errors::AppError;
use crate::models::{AppData, FeedingEvent, RecipientId, SleepInterval};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A missing file is an empty store. Anything else that keeps the file from
/// loading is an error, so a later write never replaces history it could not read.
pub async fn load_data(path: &Path) -> Result<AppData, LoadError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(AppData::default()),
        Err(source) => {
            error!("failed to read data file {}: {source}", path.display());
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&bytes).map_err(|source| {
        error!("failed to parse data file {}: {source}", path.display());
        LoadError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Writes through a sibling temp file and renames it into place.
pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, payload).await.map_err(AppError::internal)?;
    fs::rename(&tmp, path).await.map_err(AppError::internal)?;
    debug!(
        "persisted {} sleeps and {} feedings",
        data.sleeps.len(),
        data.feedings.len()
    );
    Ok(())
}

/// Filtered range queries over the record store.
impl AppData {
    pub fn has_recipient(&self, recipient_id: RecipientId) -> bool {
        self.recipients.contains_key(&recipient_id)
    }

    /// The most recently started open interval.
    pub fn latest_open_sleep(&self, recipient_id: RecipientId) -> Option<&SleepInterval> {
        self.sleeps
            .iter()
            .filter(|sleep| sleep.recipient_id == recipient_id && sleep.is_open())
            .max_by_key(|sleep| (sleep.start, sleep.id))
    }

    pub fn latest_open_sleep_mut(
        &mut self,
        recipient_id: RecipientId,
    ) -> Option<&mut SleepInterval> {
        self.sleeps
            .iter_mut()
            .filter(|sleep| sleep.recipient_id == recipient_id && sleep.is_open())
            .max_by_key(|sleep| (sleep.start, sleep.id))
    }

    /// Feedings with `from <= timestamp < to`.
    pub fn feedings_between(
        &self,
        recipient_id: RecipientId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Iterator<Item = &FeedingEvent> {
        self.feedings.iter().filter(move |feeding| {
            feeding.recipient_id == recipient_id
                && feeding.timestamp >= from
                && feeding.timestamp < to
        })
    }

    /// Closed intervals whose end falls in `from <= end < to`, paired with
    /// their end instant.
    pub fn finished_sleeps_between(
        &self,
        recipient_id: RecipientId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Iterator<Item = (&SleepInterval, DateTime<Utc>)> {
        self.sleeps.iter().filter_map(move |sleep| {
            let end = sleep.end?;
            (sleep.recipient_id == recipient_id && end >= from && end < to)
                .then_some((sleep, end))
        })
    }

    pub(crate) fn allocate_sleep_id(&mut self) -> u64 {
        self.next_sleep_id += 1;
        self.next_sleep_id
    }

    pub(crate) fn allocate_feeding_id(&mut self) -> u64 {
        self.next_feeding_id += 1;
        self.next_feeding_id
    }
}
