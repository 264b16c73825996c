use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const FALLBACK_ERROR_BODY: &str =
    r#"{"message":"Internal Server Error","error":"failed to serialize response body"}"#;

/// API Gateway proxy response: `statusCode`, `headers` and a JSON string body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub fn json_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(&payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: json_headers(),
            body,
        },
        Err(error) => {
            tracing::error!(
                component = "response",
                event = "response_serialization_failed",
                status_code,
                error = %error,
            );
            ApiGatewayResponse {
                status_code: 500,
                headers: json_headers(),
                body: FALLBACK_ERROR_BODY.to_string(),
            }
        }
    }
}

fn json_headers() -> Value {
    json!({"Content-Type": "application/json"})
}
