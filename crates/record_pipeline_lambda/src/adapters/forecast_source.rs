use async_trait::async_trait;
use record_pipeline_core::contract::FORECAST_HOURLY_SERIES;
use reqwest::Url;
use serde_json::Value;

use crate::config::ForecastConfig;
use crate::error::FetchError;

/// One outbound forecast fetch returning the decoded JSON document.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_forecast(&self) -> Result<Value, FetchError>;
}

/// Thin HTTP client for the Open-Meteo forecast endpoint.
///
/// Requests only the hourly temperature series for one fixed coordinate.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    endpoint: String,
    latitude: f64,
    longitude: f64,
}

impl OpenMeteoClient {
    pub fn new(client: reqwest::Client, config: &ForecastConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            latitude: config.latitude,
            longitude: config.longitude,
        }
    }

    pub fn forecast_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.endpoint).map_err(|error| {
            FetchError::Transport(format!(
                "invalid forecast endpoint {}: {error}",
                self.endpoint
            ))
        })?;
        url.query_pairs_mut()
            .append_pair("latitude", &self.latitude.to_string())
            .append_pair("longitude", &self.longitude.to_string())
            .append_pair("hourly", FORECAST_HOURLY_SERIES);
        Ok(url)
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn fetch_forecast(&self) -> Result<Value, FetchError> {
        let url = self.forecast_url()?;
        tracing::debug!(component = "open_meteo_client", event = "fetch_started", url = %url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| FetchError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|error| FetchError::Transport(error.to_string()))?;
        serde_json::from_str(&body).map_err(|error| FetchError::Parse(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Serves exactly one canned HTTP response and returns the request head.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("listener address");

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("connection");
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            while !head.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut chunk).await.expect("read request");
                if read == 0 {
                    break;
                }
                head.extend_from_slice(&chunk[..read]);
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&head).into_owned()
        });

        (format!("http://{address}/v1/forecast"), handle)
    }

    fn client_for(endpoint: &str) -> OpenMeteoClient {
        let config = ForecastConfig {
            table_name: "Weather".to_string(),
            endpoint: endpoint.to_string(),
            latitude: 50.4375,
            longitude: 30.5,
        };
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client should build");
        OpenMeteoClient::new(client, &config)
    }

    #[test]
    fn url_requests_only_the_temperature_series() {
        let url = client_for("https://api.open-meteo.com/v1/forecast/")
            .forecast_url()
            .expect("url should build");

        assert_eq!(
            url.as_str(),
            "https://api.open-meteo.com/v1/forecast?latitude=50.4375&longitude=30.5&hourly=temperature_2m"
        );
    }

    #[test]
    fn invalid_endpoint_is_a_transport_error() {
        let error = client_for("not a url")
            .forecast_url()
            .expect_err("endpoint should not parse");
        assert!(matches!(error, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn fetch_decodes_successful_json() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"latitude":50.4375,"hourly":{"time":[],"temperature_2m":[]}}"#,
        )
        .await;

        let payload = client_for(&endpoint)
            .fetch_forecast()
            .await
            .expect("fetch should succeed");

        assert_eq!(payload["latitude"], json!(50.4375));
        let head = server.await.expect("server task");
        assert!(head.starts_with(
            "GET /v1/forecast?latitude=50.4375&longitude=30.5&hourly=temperature_2m "
        ));
    }

    #[tokio::test]
    async fn non_success_status_carries_code_and_reason() {
        let (endpoint, server) = serve_once("503 Service Unavailable", r#"{"error":true}"#).await;

        let error = client_for(&endpoint)
            .fetch_forecast()
            .await
            .expect_err("503 should fail");

        assert_eq!(error.upstream_status(), Some(503));
        assert!(error.to_string().contains("Service Unavailable"));
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn invalid_json_body_is_a_parse_error() {
        let (endpoint, server) = serve_once("200 OK", "<html>oops</html>").await;

        let error = client_for(&endpoint)
            .fetch_forecast()
            .await
            .expect_err("html should fail to parse");

        assert!(matches!(error, FetchError::Parse(_)));
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("listener address");
        drop(listener);

        let error = client_for(&format!("http://{address}/v1/forecast"))
            .fetch_forecast()
            .await
            .expect_err("closed port should fail");

        assert!(matches!(error, FetchError::Transport(_)));
    }
}
