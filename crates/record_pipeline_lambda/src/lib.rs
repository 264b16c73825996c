//! AWS-oriented adapters and handlers for the ingest and forecast pipelines.
//!
//! This crate owns runtime integration details (Lambda entry points, the
//! DynamoDB table writer and the forecast HTTP client). Validation,
//! normalization and record contracts live in `record_pipeline_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
