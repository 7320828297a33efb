use baby_log::{
    notify::{LogNotifier, Notifier},
    router, scheduler, AppState, Config,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let data = baby_log::load_data(&config.data_path).await?;
    info!(
        recipients = data.recipients.len(),
        utc_offset_hours = config.utc_offset_hours(),
        single_open_session = config.single_open_session,
        "loaded {}",
        config.data_path.display()
    );
    let state = AppState::new(&config, data);

    match config.daily_report_at {
        Some(at) => {
            let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
            tokio::spawn(scheduler::run_daily_reports(state.clone(), notifier, at));
        }
        None => info!("daily report disabled"),
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
