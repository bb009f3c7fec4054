use crate::models::{PostOpRecord, Position};
use serde::{Deserialize, Serialize};

/// Penalty curve for the flow scales. Only the three low steps are remapped.
pub fn to_pond(value: f64) -> f64 {
    if value == 0.0 {
        -2.0
    } else if value == 0.5 {
        -1.0
    } else if value == 1.0 {
        0.0
    } else {
        value
    }
}

pub fn calc_puntuacion(record: &PostOpRecord) -> f64 {
    let ch = record.or_ch;
    let vol = record.or_vol;
    let mp = record.or_mp.weight();

    let score = to_pond(ch) + to_pond(vol) - 0.2 * record.or_mlk + 0.2 * record.or_spv
        - 2.0 * mp
        - record.dol;

    // Seated with a bowel movement and no flow at all has its own baseline.
    let seated_baseline =
        record.pos == Position::Sentado && record.hec == 1.0 && ch == 0.0 && vol == 0.0;
    let final_score = if seated_baseline { 4.0 - record.dol } else { score };

    round1(final_score)
}

pub fn has_ingesta(record: &PostOpRecord) -> bool {
    record
        .ingesta
        .as_deref()
        .is_some_and(|text| !text.trim().is_empty())
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Color band used by list rows and spreadsheet export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Low,
    Fair,
    Good,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score < 0.0 {
            ScoreBand::Low
        } else if score < 3.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Good
        }
    }
}
