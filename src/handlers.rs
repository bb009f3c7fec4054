use crate::errors::AppError;
use crate::form::{FieldUpdate, apply_updates, initial_record};
use crate::models::{
    HealthResponse, NightlyRecord, PostOpRecord, RecordStatsResponse, RecordSummary, ScoreResponse,
    ScoredRecord, SeriesResponse,
};
use crate::record_stats::{build_record_stats, summarize_record};
use crate::score::{ScoreBand, calc_puntuacion, has_ingesta};
use crate::state::AppState;
use crate::stats::{RecordFilter, build_series};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct RecordQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub record: Option<PostOpRecord>,
    #[serde(default)]
    pub updates: Vec<FieldUpdate>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub record: PostOpRecord,
    pub payload: PostOpRecord,
    pub score: f64,
    pub band: ScoreBand,
    pub has_ingesta: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records: state.records.len(),
    })
}

pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> Result<Json<Vec<ScoredRecord>>, AppError> {
    let filter = parse_filter(&query)?;
    let mut records: Vec<ScoredRecord> = filter
        .apply(&state.records)
        .into_iter()
        .map(|record| to_scored(record.clone()))
        .collect();
    records.sort_by(|a, b| {
        (b.record.fecha.as_str(), b.record.hora_or_default())
            .cmp(&(a.record.fecha.as_str(), a.record.hora_or_default()))
    });

    Ok(Json(records))
}

pub async fn new_record() -> Json<PostOpRecord> {
    Json(initial_record(Local::now().naive_local()))
}

pub async fn preview_record(Json(payload): Json<PreviewRequest>) -> Json<PreviewResponse> {
    let base = payload
        .record
        .unwrap_or_else(|| initial_record(Local::now().naive_local()));
    let record = apply_updates(&base, payload.updates);
    let score = calc_puntuacion(&record);

    Json(PreviewResponse {
        payload: record.payload(),
        score,
        band: ScoreBand::for_score(score),
        has_ingesta: has_ingesta(&record),
        record,
    })
}

pub async fn score(Json(record): Json<PostOpRecord>) -> Json<ScoreResponse> {
    let score = calc_puntuacion(&record);
    Json(ScoreResponse {
        score,
        band: ScoreBand::for_score(score),
        has_ingesta: has_ingesta(&record),
    })
}

pub async fn get_series(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> Result<Json<SeriesResponse>, AppError> {
    let filter = parse_filter(&query)?;
    Ok(Json(build_series(filter.apply(&state.records), state.reference)))
}

pub async fn post_series(
    State(state): State<AppState>,
    Json(records): Json<Vec<PostOpRecord>>,
) -> Json<SeriesResponse> {
    Json(build_series(&records, state.reference))
}

pub async fn nightly_stats(Json(records): Json<Vec<NightlyRecord>>) -> Json<RecordStatsResponse> {
    Json(build_record_stats(&records))
}

pub async fn nightly_summary(Json(record): Json<NightlyRecord>) -> Json<RecordSummary> {
    Json(summarize_record(&record))
}

fn to_scored(record: PostOpRecord) -> ScoredRecord {
    let score = calc_puntuacion(&record);
    ScoredRecord {
        score,
        band: ScoreBand::for_score(score),
        has_ingesta: has_ingesta(&record),
        record,
    }
}

fn parse_filter(query: &RecordQuery) -> Result<RecordFilter, AppError> {
    Ok(RecordFilter {
        start_date: parse_date("start_date", query.start_date.as_deref())?,
        end_date: parse_date("end_date", query.end_date.as_deref())?,
    })
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("{name} must be YYYY-MM-DD"))),
    }
}
