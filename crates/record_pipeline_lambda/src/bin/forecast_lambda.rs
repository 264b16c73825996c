use lambda_runtime::{service_fn, Error, LambdaEvent};
use record_pipeline_lambda::adapters::dynamodb::DynamoTableWriter;
use record_pipeline_lambda::adapters::forecast_source::OpenMeteoClient;
use record_pipeline_lambda::config::ForecastConfig;
use record_pipeline_lambda::handlers::forecast::handle_forecast_event;
use record_pipeline_lambda::handlers::response::ApiGatewayResponse;
use record_pipeline_lambda::logging::init_logging;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let config = ForecastConfig::from_env().map_err(|error| Error::from(error.to_string()))?;
    let http_client = reqwest::Client::builder()
        .build()
        .map_err(|error| Error::from(format!("failed to build forecast http client: {error}")))?;
    let source = OpenMeteoClient::new(http_client, &config);

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let writer = DynamoTableWriter::new(aws_sdk_dynamodb::Client::new(&aws_config));

    let config = &config;
    let source = &source;
    let writer = &writer;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<ApiGatewayResponse, Error>(
            handle_forecast_event(event.payload, config, source, writer).await,
        )
    }))
    .await
}
