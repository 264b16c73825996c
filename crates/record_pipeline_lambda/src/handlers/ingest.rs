use chrono::Utc;
use record_pipeline_core::contract::{IngestRecord, ValidationError};
use record_pipeline_core::event::decode_event_body;
use record_pipeline_core::normalize::{new_record_id, normalize_ingest};
use record_pipeline_core::validation::validate_ingest_payload;
use serde::Serialize;
use serde_json::{json, Value};

use crate::adapters::record_store::{persist_record, TableWriter};
use crate::config::IngestConfig;
use crate::error::PipelineError;
use crate::handlers::response::{json_response, ApiGatewayResponse};

const COMPONENT: &str = "ingest_handler";

#[derive(Serialize)]
struct IngestAccepted<'a> {
    message: &'static str,
    event: &'a IngestRecord,
}

/// Runs one ingest invocation and always answers with a proxy response.
pub async fn handle_ingest_event(
    event: Value,
    config: &IngestConfig,
    writer: &dyn TableWriter,
) -> ApiGatewayResponse {
    tracing::debug!(component = COMPONENT, event = "event_received", payload = %event);

    match run_ingest_pipeline(event, &config.table_name, writer).await {
        Ok(record) => json_response(
            201,
            IngestAccepted {
                message: "Event saved successfully",
                event: &record,
            },
        ),
        Err(error) => ingest_error_response(&error),
    }
}

/// Decode, validate, normalize and persist; the first failure ends the run.
pub async fn run_ingest_pipeline(
    event: Value,
    table_name: &str,
    writer: &dyn TableWriter,
) -> Result<IngestRecord, PipelineError> {
    let payload = decode_event_body(event)?;
    tracing::debug!(component = COMPONENT, event = "payload_parsed");

    let request = validate_ingest_payload(&payload)?;
    let record = normalize_ingest(request, new_record_id(), Utc::now());
    tracing::info!(
        component = COMPONENT,
        event = "record_normalized",
        record_id = %record.id,
        created_at = %record.created_at,
    );

    persist_record(writer, table_name, &record).await?;
    tracing::info!(
        component = COMPONENT,
        event = "record_persisted",
        record_id = %record.id,
        table_name,
    );

    Ok(record)
}

fn ingest_error_response(error: &PipelineError) -> ApiGatewayResponse {
    let message = match error {
        PipelineError::MalformedBody(_) => "Invalid JSON format in request body",
        PipelineError::Validation(ValidationError::NonNumericPrincipalId(_)) => {
            "Invalid input: principalId must be numeric"
        }
        PipelineError::Validation(ValidationError::PrincipalIdOutOfRange(_)) => {
            "Invalid input: principalId is out of range"
        }
        PipelineError::Validation(_) => "Invalid input: principalId and content are required",
        PipelineError::Store(_) => "Failed to save event",
        PipelineError::Upstream(_) | PipelineError::Shape(_) => "Internal Server Error",
    };

    if error.is_bad_request() {
        tracing::warn!(
            component = COMPONENT,
            event = "request_rejected",
            kind = error.kind(),
            error = %error,
        );
    } else {
        tracing::error!(
            component = COMPONENT,
            event = "pipeline_failed",
            kind = error.kind(),
            error = %error,
        );
    }

    json_response(
        error.status_code(),
        json!({
            "message": message,
            "error": error.to_string(),
        }),
    )
}
