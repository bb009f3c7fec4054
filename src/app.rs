use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/records", get(handlers::list_records))
        .route("/api/records/new", get(handlers::new_record))
        .route("/api/records/preview", post(handlers::preview_record))
        .route("/api/score", post(handlers::score))
        .route("/api/series", get(handlers::get_series).post(handlers::post_series))
        .route("/api/nightly/stats", post(handlers::nightly_stats))
        .route("/api/nightly/summary", post(handlers::nightly_summary))
        .with_state(state)
}
