//! Shared ingest and forecast pipeline primitives.
//!
//! This crate owns validation, normalization and the persisted record
//! contracts. It intentionally excludes AWS SDK, HTTP client and Lambda
//! runtime concerns so every function here is pure and deterministic given
//! its inputs (identifiers and timestamps are passed in).

pub mod contract;
pub mod event;
pub mod normalize;
pub mod validation;
