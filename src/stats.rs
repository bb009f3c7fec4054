use crate::models::{ChartPoint, DEFAULT_HORA, FlowPoint, PostOpRecord, Position, SeriesResponse};
use crate::score::{calc_puntuacion, has_ingesta, round1};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::debug;

pub const REFERENCE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const MS_PER_DAY: f64 = 86_400_000.0;

pub fn default_reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 21)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Inclusive date window on `fecha`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn matches(&self, record: &PostOpRecord) -> bool {
        let Ok(date) = record.fecha.parse::<NaiveDate>() else {
            return true;
        };
        if self.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, records: &'a [PostOpRecord]) -> Vec<&'a PostOpRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

pub fn record_datetime(fecha: &str, hora: Option<&str>) -> Option<NaiveDateTime> {
    let hora = hora.map(str::trim).filter(|h| !h.is_empty()).unwrap_or(DEFAULT_HORA);
    let hora = if hora.len() == 5 {
        format!("{hora}:00")
    } else {
        hora.to_string()
    };
    NaiveDateTime::parse_from_str(&format!("{}T{hora}", fecha.trim()), "%Y-%m-%dT%H:%M:%S%.f").ok()
}

pub fn days_since_reference(
    fecha: &str,
    hora: Option<&str>,
    reference: NaiveDateTime,
) -> Option<f64> {
    let at = record_datetime(fecha, hora)?;
    let elapsed = (at - reference).num_milliseconds() as f64;
    Some(round1(elapsed / MS_PER_DAY))
}

pub fn build_series<'a, I>(records: I, reference: NaiveDateTime) -> SeriesResponse
where
    I: IntoIterator<Item = &'a PostOpRecord>,
{
    let mut score_points = Vec::new();
    let mut flow_points = Vec::new();
    let mut max_offset: Option<f64> = None;
    let mut excluded_ingesta = 0usize;
    let mut skipped_invalid = 0usize;

    for record in records {
        let Some(days) = days_since_reference(&record.fecha, record.hora.as_deref(), reference)
        else {
            debug!(fecha = %record.fecha, hora = ?record.hora, "skipping record with unparseable date");
            skipped_invalid += 1;
            continue;
        };
        max_offset = Some(max_offset.map_or(days, |max| max.max(days)));

        if has_ingesta(record) {
            excluded_ingesta += 1;
            continue;
        }

        let hora = record.hora.clone().unwrap_or_default();
        score_points.push(ChartPoint {
            days_since_reference: days,
            score: calc_puntuacion(record),
            day_average: 0.0,
            fecha: record.fecha.clone(),
            hora: hora.clone(),
        });

        if !(record.pos == Position::Sentado && record.or_ch == 0.0) {
            flow_points.push(FlowPoint {
                days_since_reference: days,
                flow: record.or_ch,
                day_average: 0.0,
                fecha: record.fecha.clone(),
                hora,
            });
        }
    }

    score_points.sort_by(|a, b| a.days_since_reference.total_cmp(&b.days_since_reference));
    flow_points.sort_by(|a, b| a.days_since_reference.total_cmp(&b.days_since_reference));

    let score_averages = day_averages(score_points.iter().map(|p| (p.days_since_reference, p.score)));
    for point in &mut score_points {
        point.day_average = score_averages[&day_key(point.days_since_reference)];
    }

    let flow_averages = day_averages(flow_points.iter().map(|p| (p.days_since_reference, p.flow)));
    for point in &mut flow_points {
        point.day_average = flow_averages[&day_key(point.days_since_reference)];
    }

    let x_max = max_offset.map_or(0.0, |max| max.ceil().max(0.0));
    let y_domain = score_domain(score_points.iter().map(|p| p.score));

    SeriesResponse {
        reference: reference.format(REFERENCE_FORMAT).to_string(),
        score_points,
        flow_points,
        x_domain: [0.0, x_max],
        y_domain,
        excluded_ingesta,
        skipped_invalid,
    }
}

fn day_key(days: f64) -> i64 {
    days.round() as i64
}

fn day_averages(values: impl Iterator<Item = (f64, f64)>) -> BTreeMap<i64, f64> {
    let mut groups: BTreeMap<i64, (f64, u32)> = BTreeMap::new();
    for (days, value) in values {
        let entry = groups.entry(day_key(days)).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(day, (sum, count))| (day, round1(sum / f64::from(count))))
        .collect()
}

fn score_domain(scores: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = scores.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), score| {
        (min.min(score), max.max(score))
    });
    [(min - 1.0).min(-1.0), (max + 1.0).max(6.0)]
}
