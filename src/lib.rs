pub mod app;
pub mod chart;
pub mod clock;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod records;
pub mod scheduler;
pub mod sessions;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
