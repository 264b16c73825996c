pub mod forecast;
pub mod ingest;
pub mod response;
