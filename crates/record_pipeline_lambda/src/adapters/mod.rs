pub mod dynamodb;
pub mod forecast_source;
pub mod record_store;
