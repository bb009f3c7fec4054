pub mod app;
pub mod coerce;
pub mod config;
pub mod errors;
pub mod form;
pub mod handlers;
pub mod models;
pub mod record_stats;
pub mod score;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::router;
pub use config::AppConfig;
pub use record_stats::build_record_stats;
pub use score::{calc_puntuacion, has_ingesta};
pub use state::AppState;
pub use stats::build_series;
pub use storage::load_records;
