use crate::models::PostOpRecord;
use chrono::NaiveDateTime;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub reference: NaiveDateTime,
    pub records: Arc<Vec<PostOpRecord>>,
}

impl AppState {
    pub fn new(reference: NaiveDateTime, records: Vec<PostOpRecord>) -> Self {
        Self {
            reference,
            records: Arc::new(records),
        }
    }
}
