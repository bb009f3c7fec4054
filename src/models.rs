use crate::coerce;
use crate::score::ScoreBand;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_HORA: &str = "12:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Depie,
    Sentado,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Depie => "depie",
            Position::Sentado => "sentado",
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value.as_ref().and_then(Value::as_str) {
            Some("sentado") => Position::Sentado,
            _ => Position::Depie,
        })
    }
}

/// `or-mp`: either no event at all or an intensity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MicroPressure {
    #[default]
    No,
    Level(f64),
}

impl MicroPressure {
    pub fn weight(self) -> f64 {
        match self {
            MicroPressure::No => -1.0,
            MicroPressure::Level(level) => level,
        }
    }
}

impl Serialize for MicroPressure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MicroPressure::No => serializer.serialize_str("no"),
            MicroPressure::Level(level) => serializer.serialize_f64(*level),
        }
    }
}

impl<'de> Deserialize<'de> for MicroPressure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(Value::Null) => MicroPressure::No,
            Some(Value::String(ref s)) if s == "no" => MicroPressure::No,
            Some(other) => MicroPressure::Level(coerce::to_number(Some(&other))),
        })
    }
}

/// One post-operative daily entry as stored by the records API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostOpRecord {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, deserialize_with = "coerce::string_or_default")]
    pub fecha: String,
    #[serde(default, deserialize_with = "coerce::non_empty_text", skip_serializing_if = "Option::is_none")]
    pub hora: Option<String>,
    #[serde(default)]
    pub pos: Position,

    #[serde(rename = "or-gan", default, deserialize_with = "coerce::number")]
    pub or_gan: f64,
    #[serde(rename = "or-ur", default, deserialize_with = "coerce::number")]
    pub or_ur: f64,
    #[serde(rename = "or-ch", default, deserialize_with = "coerce::number")]
    pub or_ch: f64,
    #[serde(rename = "or-vol", default, deserialize_with = "coerce::number")]
    pub or_vol: f64,
    #[serde(rename = "or-mp", default)]
    pub or_mp: MicroPressure,
    #[serde(rename = "mp-por", default, deserialize_with = "coerce::text", skip_serializing_if = "Option::is_none")]
    pub mp_por: Option<String>,
    #[serde(rename = "or-mlk", default, deserialize_with = "coerce::number")]
    pub or_mlk: f64,
    #[serde(rename = "or-spv", default, deserialize_with = "coerce::number")]
    pub or_spv: f64,
    #[serde(default, deserialize_with = "coerce::number")]
    pub dol: f64,
    #[serde(default, deserialize_with = "coerce::number")]
    pub hec: f64,

    #[serde(default, deserialize_with = "coerce::truthy_text", skip_serializing_if = "Option::is_none")]
    pub ingesta: Option<String>,
    #[serde(rename = "ingesta-cantidad", default, deserialize_with = "coerce::text", skip_serializing_if = "Option::is_none")]
    pub ingesta_cantidad: Option<String>,
    #[serde(rename = "medicación", default, deserialize_with = "coerce::text", skip_serializing_if = "Option::is_none")]
    pub medicacion: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostOpRecord {
    pub fn hora_or_default(&self) -> &str {
        self.hora.as_deref().unwrap_or(DEFAULT_HORA)
    }

    /// Body for the records API create/update calls: internal identifiers removed.
    pub fn payload(&self) -> PostOpRecord {
        PostOpRecord {
            id: None,
            created_at: None,
            updated_at: None,
            ..self.clone()
        }
    }
}

/// One logged leak (`lekar` entry) of a nightly record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Leak {
    #[serde(rename = "tími", default, deserialize_with = "coerce::string_or_default")]
    pub timi: String,
    #[serde(rename = "aðvarun", default, deserialize_with = "coerce::flag")]
    pub advarun: bool,
    /// Intensity, 1 to 3.
    #[serde(default, deserialize_with = "coerce::number")]
    pub styrkur: f64,
    /// Urgency, 0 to 2.
    #[serde(rename = "þörf", default, deserialize_with = "coerce::number")]
    pub thorf: f64,
}

/// One voiding (`lát` entry).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Voiding {
    #[serde(rename = "tími", default, deserialize_with = "coerce::string_or_default")]
    pub timi: String,
    #[serde(default, deserialize_with = "coerce::number")]
    pub flaedi: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Alcohol {
    #[serde(rename = "bjór", default, deserialize_with = "coerce::number")]
    pub bjor: f64,
    #[serde(rename = "vín", default, deserialize_with = "coerce::number")]
    pub vin: f64,
    #[serde(default, deserialize_with = "coerce::number")]
    pub annar: f64,
}

impl Alcohol {
    pub fn total(&self) -> f64 {
        self.bjor + self.vin + self.annar
    }

    pub fn any(&self) -> bool {
        self.bjor > 0.0 || self.vin > 0.0 || self.annar > 0.0
    }
}

/// `æfing` was stored as a level number in older records and as `{ type, km }` later.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Exercise {
    #[default]
    None,
    Level(f64),
    Activity { kind: String, km: Option<f64> },
}

impl Exercise {
    pub fn is_active(&self) -> bool {
        match self {
            Exercise::None => false,
            Exercise::Level(level) => *level > 0.0,
            Exercise::Activity { .. } => true,
        }
    }
}

impl Serialize for Exercise {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self {
            Exercise::None => serde_json::json!({ "type": "nej", "km": null }),
            Exercise::Level(level) => serde_json::json!(level),
            Exercise::Activity { kind, km } => serde_json::json!({ "type": kind, "km": km }),
        };
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Exercise {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => Exercise::Level(n.as_f64().unwrap_or(0.0)),
            Some(Value::Object(map)) => {
                match map.get("type").and_then(Value::as_str).unwrap_or("nej") {
                    "nej" | "" => Exercise::None,
                    kind => Exercise::Activity {
                        kind: kind.to_string(),
                        km: map.get("km").and_then(Value::as_f64),
                    },
                }
            }
            Some(Value::String(kind)) if kind != "nej" && !kind.is_empty() => {
                Exercise::Activity { kind, km: None }
            }
            _ => Exercise::None,
        })
    }
}

/// Lifestyle block (`upplýsingar`) of a nightly record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lifestyle {
    #[serde(default, deserialize_with = "coerce::number")]
    pub kaffi: f64,
    #[serde(rename = "áfengi", default, deserialize_with = "coerce::or_default")]
    pub afengi: Alcohol,
    #[serde(rename = "æfing", default)]
    pub aefing: Exercise,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Nightly incontinence log entry as stored by the records API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NightlyRecord {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "coerce::string_or_default")]
    pub date: String,
    #[serde(rename = "upplýsingar", default, deserialize_with = "coerce::or_default")]
    pub upplysingar: Lifestyle,
    #[serde(default, deserialize_with = "coerce::or_default")]
    pub lekar: Vec<Leak>,
    #[serde(rename = "lát", default, deserialize_with = "coerce::or_default")]
    pub lat: Vec<Voiding>,
    /// Leak count typed in by hand; takes precedence over the `lekar` list when set.
    #[serde(rename = "fjöldi leka", default, deserialize_with = "coerce::number")]
    pub fjoldi_leka: f64,
    #[serde(default, deserialize_with = "coerce::string_or_default")]
    pub athugasemd: String,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub ready: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NightlyRecord {
    pub fn leak_count(&self) -> u32 {
        if self.fjoldi_leka > 0.0 {
            self.fjoldi_leka.round() as u32
        } else {
            self.lekar.len() as u32
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordSummary {
    pub total_lekar: u32,
    pub total_lat: u32,
    pub average_intensity: f64,
    pub total_alcohol: f64,
    pub has_exercise: bool,
    pub coffee_cups: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordStatsResponse {
    pub total_records: usize,
    pub total_lekar: u32,
    pub total_lat: u32,
    pub average_lekar_per_day: f64,
    pub last_record_date: Option<String>,
    pub weekly_average: f64,
    pub average_intensity: f64,
    pub average_coffee: f64,
    pub exercise_percentage: u32,
    pub alcohol_percentage: u32,
    pub trend: Trend,
}

#[derive(Debug, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: PostOpRecord,
    pub score: f64,
    pub band: ScoreBand,
    pub has_ingesta: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: f64,
    pub band: ScoreBand,
    pub has_ingesta: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartPoint {
    pub days_since_reference: f64,
    pub score: f64,
    pub day_average: f64,
    pub fecha: String,
    pub hora: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlowPoint {
    pub days_since_reference: f64,
    pub flow: f64,
    pub day_average: f64,
    pub fecha: String,
    pub hora: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub reference: String,
    pub score_points: Vec<ChartPoint>,
    pub flow_points: Vec<FlowPoint>,
    pub x_domain: [f64; 2],
    pub y_domain: [f64; 2],
    pub excluded_ingesta: usize,
    pub skipped_invalid: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::calc_puntuacion;
    use serde_json::json;

    #[test]
    fn record_applies_documented_defaults() {
        let record: PostOpRecord = serde_json::from_value(json!({ "fecha": "2026-01-25" })).unwrap();
        assert_eq!(record.pos, Position::Depie);
        assert_eq!(record.or_mp, MicroPressure::No);
        assert_eq!(record.hora_or_default(), "12:00");
        assert_eq!(record.or_ch, 0.0);
        assert!(record.ingesta.is_none());
    }

    #[test]
    fn record_coerces_loose_fields() {
        let record: PostOpRecord = serde_json::from_value(json!({
            "fecha": "2026-01-25",
            "hora": "",
            "pos": "sentado",
            "or-ch": "1.5",
            "or-vol": null,
            "or-mp": "2",
            "dol": "x",
            "ingesta": 300,
            "notas": "libre"
        }))
        .unwrap();
        assert_eq!(record.hora, None);
        assert_eq!(record.pos, Position::Sentado);
        assert_eq!(record.or_ch, 1.5);
        assert_eq!(record.or_vol, 0.0);
        assert_eq!(record.or_mp, MicroPressure::Level(2.0));
        assert_eq!(record.dol, 0.0);
        assert_eq!(record.ingesta.as_deref(), Some("300"));
        assert_eq!(record.extra.get("notas"), Some(&json!("libre")));
    }

    #[test]
    fn nightly_record_reads_both_exercise_shapes() {
        let older: NightlyRecord = serde_json::from_value(json!({
            "date": "2026-01-10",
            "upplýsingar": { "kaffi": "2", "æfing": 1, "áfengi": null },
            "lekar": null
        }))
        .unwrap();
        assert_eq!(older.upplysingar.kaffi, 2.0);
        assert_eq!(older.upplysingar.aefing, Exercise::Level(1.0));
        assert!(older.lekar.is_empty());
        assert_eq!(older.upplysingar.afengi, Alcohol::default());

        let newer: NightlyRecord = serde_json::from_value(json!({
            "date": "2026-01-11",
            "upplýsingar": { "æfing": { "type": "labba", "km": 4.5 }, "hvar": "heima" },
            "lekar": [{ "tími": "03:10", "aðvarun": true, "styrkur": 2, "þörf": 1 }],
            "lát": [{ "tími": "01:00", "flaedi": 1 }]
        }))
        .unwrap();
        assert_eq!(
            newer.upplysingar.aefing,
            Exercise::Activity { kind: "labba".to_string(), km: Some(4.5) }
        );
        assert!(newer.lekar[0].advarun);
        assert_eq!(newer.leak_count(), 1);
        assert_eq!(newer.upplysingar.extra.get("hvar"), Some(&json!("heima")));

        let idle: NightlyRecord = serde_json::from_value(json!({
            "upplýsingar": { "æfing": { "type": "nej", "km": null } }
        }))
        .unwrap();
        assert!(!idle.upplysingar.aefing.is_active());
    }

    #[test]
    fn typed_leak_count_wins_over_list() {
        let record: NightlyRecord = serde_json::from_value(json!({
            "date": "2026-01-12",
            "fjöldi leka": 4,
            "lekar": [{ "styrkur": 1 }]
        }))
        .unwrap();
        assert_eq!(record.leak_count(), 4);
    }

    #[test]
    fn payload_strips_identifiers_and_keeps_score() {
        let record: PostOpRecord = serde_json::from_value(json!({
            "_id": "65b1f0",
            "createdAt": "2026-01-25T10:00:00Z",
            "updatedAt": "2026-01-25T10:05:00Z",
            "fecha": "2026-01-25",
            "hora": "08:30",
            "pos": "depie",
            "or-ch": 1.5,
            "or-vol": 2,
            "or-mp": 1,
            "or-mlk": 3,
            "or-spv": 4,
            "dol": 1,
            "hec": 0
        }))
        .unwrap();

        let encoded = serde_json::to_value(record.payload()).unwrap();
        assert!(encoded.get("_id").is_none());
        assert!(encoded.get("createdAt").is_none());
        assert!(encoded.get("updatedAt").is_none());

        let decoded: PostOpRecord = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.id, None);
        assert_eq!(decoded.or_ch, record.or_ch);
        assert_eq!(decoded.or_mp, record.or_mp);
        assert_eq!(calc_puntuacion(&decoded), calc_puntuacion(&record));
    }
}
