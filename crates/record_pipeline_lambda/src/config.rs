use crate::error::ConfigError;

pub const TARGET_TABLE_ENV: &str = "TARGET_TABLE";
pub const FORECAST_ENDPOINT_ENV: &str = "FORECAST_ENDPOINT";
pub const FORECAST_LATITUDE_ENV: &str = "FORECAST_LATITUDE";
pub const FORECAST_LONGITUDE_ENV: &str = "FORECAST_LONGITUDE";

pub const DEFAULT_FORECAST_TABLE: &str = "Weather";
pub const DEFAULT_FORECAST_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_FORECAST_LATITUDE: f64 = 50.4375;
pub const DEFAULT_FORECAST_LONGITUDE: f64 = 30.5;

#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub table_name: String,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let table_name =
            non_blank(&lookup, TARGET_TABLE_ENV).ok_or(ConfigError::Missing(TARGET_TABLE_ENV))?;
        Ok(Self { table_name })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub table_name: String,
    pub endpoint: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ForecastConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            table_name: non_blank(&lookup, TARGET_TABLE_ENV)
                .unwrap_or_else(|| DEFAULT_FORECAST_TABLE.to_string()),
            endpoint: non_blank(&lookup, FORECAST_ENDPOINT_ENV)
                .unwrap_or_else(|| DEFAULT_FORECAST_ENDPOINT.to_string()),
            latitude: coordinate(&lookup, FORECAST_LATITUDE_ENV, DEFAULT_FORECAST_LATITUDE, 90.0)?,
            longitude: coordinate(
                &lookup,
                FORECAST_LONGITUDE_ENV,
                DEFAULT_FORECAST_LONGITUDE,
                180.0,
            )?,
        })
    }
}

fn non_blank(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn coordinate(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: f64,
    bound: f64,
) -> Result<f64, ConfigError> {
    let Some(raw) = non_blank(lookup, key) else {
        return Ok(default);
    };

    let value = raw.parse::<f64>().map_err(|error| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: error.to_string(),
    })?;

    if !value.is_finite() || value.abs() > bound {
        return Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: format!("must be within ±{bound}"),
        });
    }

    Ok(value)
}
