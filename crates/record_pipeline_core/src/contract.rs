use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

pub const HOURLY_TIME_UNIT: &str = "iso8601";
pub const HOURLY_TEMPERATURE_UNIT: &str = "°C";
pub const FORECAST_HOURLY_SERIES: &str = "temperature_2m";

/// Server-generated record identifier (hyphenated v4 UUID).
pub type RecordId = String;

/// Anything persisted through the record store is keyed by its own id.
pub trait PersistedRecord: Serialize {
    fn record_id(&self) -> &str;
}

/// Numeric principal identifier after best-effort coercion.
///
/// Integral values serialize as JSON integers so `5` round-trips as `5`
/// rather than `5.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalId(f64);

/// DynamoDB number attributes hold magnitudes in `[1e-130, 1e126)` plus zero.
const MAX_STORABLE_MAGNITUDE: f64 = 1e126;
const MIN_STORABLE_MAGNITUDE: f64 = 1e-130;

impl PrincipalId {
    /// Returns `None` for non-finite values and for magnitudes the store
    /// cannot carry.
    pub fn new(value: f64) -> Option<Self> {
        let magnitude = value.abs();
        let storable = value == 0.0
            || (MIN_STORABLE_MAGNITUDE..MAX_STORABLE_MAGNITUDE).contains(&magnitude);
        (value.is_finite() && storable).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    fn as_integer(self) -> Option<i64> {
        const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
        (self.0.fract() == 0.0 && self.0 >= -I64_BOUND && self.0 < I64_BOUND)
            .then_some(self.0 as i64)
    }
}

impl Serialize for PrincipalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(integer) => serializer.serialize_i64(integer),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for PrincipalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        PrincipalId::new(value).ok_or_else(|| {
            serde::de::Error::custom("principalId must be a finite, storable number")
        })
    }
}

/// Output of the validator: the two required ingest fields.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestRequest {
    pub principal_id: PrincipalId,
    pub content: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestRecord {
    pub id: RecordId,
    pub principal_id: PrincipalId,
    pub created_at: String,
    pub body: Value,
}

impl PersistedRecord for IngestRecord {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlyUnits {
    pub time: String,
    pub temperature_2m: String,
}

impl HourlyUnits {
    /// The persisted units never depend on what upstream reports.
    pub fn fixed() -> Self {
        Self {
            time: HOURLY_TIME_UNIT.to_string(),
            temperature_2m: HOURLY_TEMPERATURE_UNIT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(rename = "generationtime_ms", skip_serializing_if = "Option::is_none")]
    pub generation_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone_abbreviation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    pub hourly_units: HourlyUnits,
    pub hourly: HourlySeries,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastRecord {
    pub id: RecordId,
    pub forecast: Forecast,
}

impl PersistedRecord for ForecastRecord {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request payload must be a JSON object")]
    NotAnObject,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("principalId must coerce to a finite number, got {0}")]
    NonNumericPrincipalId(String),
    #[error("principalId {0} is outside the storable number range")]
    PrincipalIdOutOfRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("forecast payload must be a JSON object")]
    NotAnObject,
    #[error("forecast payload is missing {0}")]
    MissingField(&'static str),
    #[error("forecast field {field} has an unexpected type: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error(
        "forecast hourly series lengths differ: {time_len} timestamps, {temperature_len} temperatures"
    )]
    LengthMismatch {
        time_len: usize,
        temperature_len: usize,
    },
}
