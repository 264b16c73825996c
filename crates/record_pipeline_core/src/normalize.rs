use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::contract::{
    Forecast, ForecastRecord, HourlySeries, HourlyUnits, IngestRecord, IngestRequest, RecordId,
    ShapeError, FORECAST_HOURLY_SERIES,
};

/// Fresh random (v4) identifier; 122 random bits per id.
pub fn new_record_id() -> RecordId {
    Uuid::new_v4().to_string()
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-02-14T08:30:00.125Z`.
pub fn format_created_at(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn normalize_ingest(
    request: IngestRequest,
    id: RecordId,
    created_at: DateTime<Utc>,
) -> IngestRecord {
    IngestRecord {
        id,
        principal_id: request.principal_id,
        created_at: format_created_at(created_at),
        body: request.content,
    }
}

/// Projects an upstream forecast payload into the persisted record shape.
///
/// The hourly series are mandatory and must be the same length. Scalar
/// metadata is copied when present and omitted otherwise. `hourly_units`
/// is always the fixed pair regardless of upstream contents.
pub fn normalize_forecast(id: RecordId, payload: &Value) -> Result<ForecastRecord, ShapeError> {
    let object = payload.as_object().ok_or(ShapeError::NotAnObject)?;

    let hourly = object
        .get("hourly")
        .and_then(Value::as_object)
        .ok_or(ShapeError::MissingField("hourly"))?;
    let time: Vec<String> = required_field(hourly, "time", "hourly.time")?;
    let temperature_2m: Vec<Option<f64>> =
        required_field(hourly, FORECAST_HOURLY_SERIES, "hourly.temperature_2m")?;

    if time.len() != temperature_2m.len() {
        return Err(ShapeError::LengthMismatch {
            time_len: time.len(),
            temperature_len: temperature_2m.len(),
        });
    }

    let forecast = Forecast {
        latitude: optional_field(object, "latitude")?,
        longitude: optional_field(object, "longitude")?,
        generation_time_ms: optional_field(object, "generationtime_ms")?,
        utc_offset_seconds: optional_field(object, "utc_offset_seconds")?,
        timezone: optional_field(object, "timezone")?,
        timezone_abbreviation: optional_field(object, "timezone_abbreviation")?,
        elevation: optional_field(object, "elevation")?,
        hourly_units: HourlyUnits::fixed(),
        hourly: HourlySeries {
            time,
            temperature_2m,
        },
    };

    Ok(ForecastRecord { id, forecast })
}

fn required_field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &str,
    path: &'static str,
) -> Result<T, ShapeError> {
    match object.get(key) {
        None | Some(Value::Null) => Err(ShapeError::MissingField(path)),
        Some(value) => decode_field(value, path),
    }
}

fn optional_field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<T>, ShapeError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => decode_field(value, key).map(Some),
    }
}

fn decode_field<T: DeserializeOwned>(value: &Value, path: &'static str) -> Result<T, ShapeError> {
    serde_json::from_value(value.clone()).map_err(|error| ShapeError::InvalidField {
        field: path,
        reason: error.to_string(),
    })
}
