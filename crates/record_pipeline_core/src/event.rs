use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventDecodeError {
    #[error("malformed JSON body: {0}")]
    MalformedBody(String),
}

/// Extracts the request payload from an HTTP-shaped trigger event.
///
/// A string `body` is parsed as JSON, any other `body` value is taken as
/// already decoded. Events without a `body` key are direct invocations and
/// are returned unchanged.
pub fn decode_event_body(event: Value) -> Result<Value, EventDecodeError> {
    let Value::Object(mut object) = event else {
        return Ok(event);
    };

    match object.remove("body") {
        None => Ok(Value::Object(object)),
        Some(Value::String(text)) => serde_json::from_str(&text)
            .map_err(|error| EventDecodeError::MalformedBody(error.to_string())),
        Some(body) => Ok(body),
    }
}
