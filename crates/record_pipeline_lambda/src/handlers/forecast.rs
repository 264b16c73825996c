use record_pipeline_core::contract::RecordId;
use record_pipeline_core::normalize::{new_record_id, normalize_forecast};
use serde_json::{json, Value};

use crate::adapters::forecast_source::ForecastSource;
use crate::adapters::record_store::{persist_record, TableWriter};
use crate::config::ForecastConfig;
use crate::error::PipelineError;
use crate::handlers::response::{json_response, ApiGatewayResponse};

const COMPONENT: &str = "forecast_handler";

/// Runs one forecast invocation. The trigger payload is only logged.
pub async fn handle_forecast_event(
    event: Value,
    config: &ForecastConfig,
    source: &dyn ForecastSource,
    writer: &dyn TableWriter,
) -> ApiGatewayResponse {
    tracing::info!(component = COMPONENT, event = "event_received", payload = %event);

    match run_forecast_pipeline(&config.table_name, source, writer).await {
        Ok(record_id) => json_response(
            200,
            json!({
                "success": true,
                "message": "Weather data stored successfully",
                "id": record_id,
            }),
        ),
        Err(error) => {
            tracing::error!(
                component = COMPONENT,
                event = "pipeline_failed",
                kind = error.kind(),
                error = %error,
            );
            json_response(
                error.status_code(),
                json!({
                    "success": false,
                    "message": "Internal Server Error",
                    "error": error.to_string(),
                }),
            )
        }
    }
}

/// Fetch, normalize and persist exactly one forecast snapshot.
pub async fn run_forecast_pipeline(
    table_name: &str,
    source: &dyn ForecastSource,
    writer: &dyn TableWriter,
) -> Result<RecordId, PipelineError> {
    let payload = source.fetch_forecast().await?;
    tracing::info!(component = COMPONENT, event = "forecast_fetched");

    let record = normalize_forecast(new_record_id(), &payload)?;
    tracing::info!(
        component = COMPONENT,
        event = "record_normalized",
        record_id = %record.id,
        hourly_points = record.forecast.hourly.time.len(),
    );

    let record_id = persist_record(writer, table_name, &record).await?;
    tracing::info!(
        component = COMPONENT,
        event = "record_persisted",
        record_id = %record_id,
        table_name,
    );

    Ok(record_id)
}
