use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/recipients/:id", get(handlers::dashboard))
        .route("/api/recipients", post(handlers::start))
        .route("/api/recipients/:id/sleep", get(handlers::sleep_state))
        .route("/api/recipients/:id/sleep/begin", post(handlers::begin_sleep))
        .route("/api/recipients/:id/sleep/end", post(handlers::end_sleep))
        .route("/api/recipients/:id/feedings", post(handlers::record_feeding))
        .route("/api/recipients/:id/stats", get(handlers::get_stats))
        .route("/api/recipients/:id/series", get(handlers::get_series))
        .route("/api/recipients/:id/chart", get(handlers::get_chart))
        .with_state(state)
}
