use record_pipeline_core::contract::{ShapeError, ValidationError};
use record_pipeline_core::event::EventDecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("forecast request failed: {0}")]
    Transport(String),
    #[error(
        "forecast endpoint returned HTTP {status}: {}",
        .reason.as_deref().unwrap_or("no reason given")
    )]
    Status { status: u16, reason: Option<String> },
    #[error("forecast response is not valid JSON: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to put record {record_id} into table {table_name}: {message}")]
pub struct StoreError {
    pub table_name: String,
    pub record_id: String,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Every way a single pipeline invocation can stop early.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    MalformedBody(#[from] EventDecodeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Upstream(#[from] FetchError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PipelineError {
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::MalformedBody(_) | Self::Validation(_))
    }

    pub fn status_code(&self) -> u16 {
        if self.is_bad_request() {
            400
        } else {
            500
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) | Self::Validation(_) => "validation_error",
            Self::Upstream(_) => "upstream_error",
            Self::Shape(_) => "shape_error",
            Self::Store(_) => "store_error",
        }
    }
}
