use crate::coerce;
use crate::models::{MicroPressure, PostOpRecord, Position};
use chrono::NaiveDateTime;
use serde::Deserialize;

/// Blank entry for the given local time.
pub fn initial_record(now: NaiveDateTime) -> PostOpRecord {
    PostOpRecord {
        fecha: now.format("%Y-%m-%d").to_string(),
        hora: Some(now.format("%H:%M").to_string()),
        pos: Position::Depie,
        or_mp: MicroPressure::No,
        mp_por: Some(String::new()),
        ingesta: Some(String::new()),
        ingesta_cantidad: Some(String::new()),
        medicacion: Some(String::new()),
        ..PostOpRecord::default()
    }
}

/// A single edit coming from the entry form, keyed by the records API field name.
/// Numeric values use the same loose cast as record fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value")]
pub enum FieldUpdate {
    #[serde(rename = "fecha")]
    Fecha(String),
    #[serde(rename = "hora")]
    Hora(String),
    #[serde(rename = "pos")]
    Pos(Position),
    #[serde(rename = "or-gan")]
    Gan(#[serde(deserialize_with = "coerce::number")] f64),
    #[serde(rename = "or-ur")]
    Ur(#[serde(deserialize_with = "coerce::number")] f64),
    #[serde(rename = "or-ch")]
    Ch(#[serde(deserialize_with = "coerce::number")] f64),
    #[serde(rename = "or-vol")]
    Vol(#[serde(deserialize_with = "coerce::number")] f64),
    #[serde(rename = "or-mp")]
    Mp(MicroPressure),
    #[serde(rename = "mp-por")]
    MpPor(String),
    #[serde(rename = "or-mlk")]
    Mlk(#[serde(deserialize_with = "coerce::number")] f64),
    #[serde(rename = "or-spv")]
    Spv(#[serde(deserialize_with = "coerce::number")] f64),
    #[serde(rename = "dol")]
    Dol(#[serde(deserialize_with = "coerce::number")] f64),
    #[serde(rename = "hec")]
    Hec(#[serde(deserialize_with = "coerce::number")] f64),
    #[serde(rename = "ingesta")]
    Ingesta(String),
    #[serde(rename = "ingesta-cantidad")]
    IngestaCantidad(String),
    #[serde(rename = "medicación")]
    Medicacion(String),
}

pub fn apply_update(record: &PostOpRecord, update: FieldUpdate) -> PostOpRecord {
    let mut next = record.clone();
    match update {
        FieldUpdate::Fecha(value) => next.fecha = value,
        FieldUpdate::Hora(value) => next.hora = Some(value).filter(|h| !h.trim().is_empty()),
        FieldUpdate::Pos(value) => next.pos = value,
        FieldUpdate::Gan(value) => next.or_gan = value,
        FieldUpdate::Ur(value) => next.or_ur = value,
        FieldUpdate::Ch(value) => next.or_ch = value,
        FieldUpdate::Vol(value) => next.or_vol = value,
        FieldUpdate::Mp(value) => {
            if value == MicroPressure::No {
                next.mp_por = Some(String::new());
            }
            next.or_mp = value;
        }
        FieldUpdate::MpPor(value) => next.mp_por = Some(value),
        FieldUpdate::Mlk(value) => next.or_mlk = value,
        FieldUpdate::Spv(value) => next.or_spv = value,
        FieldUpdate::Dol(value) => next.dol = value,
        FieldUpdate::Hec(value) => next.hec = value,
        FieldUpdate::Ingesta(value) => {
            if value.is_empty() {
                next.ingesta_cantidad = Some(String::new());
            }
            next.ingesta = Some(value);
        }
        FieldUpdate::IngestaCantidad(value) => next.ingesta_cantidad = Some(value),
        FieldUpdate::Medicacion(value) => next.medicacion = Some(value),
    }
    next
}

pub fn apply_updates(
    record: &PostOpRecord,
    updates: impl IntoIterator<Item = FieldUpdate>,
) -> PostOpRecord {
    updates
        .into_iter()
        .fold(record.clone(), |acc, update| apply_update(&acc, update))
}
