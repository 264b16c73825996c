use serde_json::Value;

use crate::contract::{IngestRequest, PrincipalId, ValidationError};

pub const PRINCIPAL_ID_FIELD: &str = "principalId";
pub const CONTENT_FIELD: &str = "content";

/// Checks the decoded ingest payload and extracts `{principalId, content}`.
///
/// `principalId` must be present, non-null and not a blank string, and must
/// coerce to a finite number the store can hold; `0` is accepted. `content`
/// only has to be present: an explicit `null`, `0`, `""` or `false` all pass.
pub fn validate_ingest_payload(payload: &Value) -> Result<IngestRequest, ValidationError> {
    let object = payload.as_object().ok_or(ValidationError::NotAnObject)?;

    let raw_principal = match object.get(PRINCIPAL_ID_FIELD) {
        None | Some(Value::Null) => return Err(ValidationError::MissingField(PRINCIPAL_ID_FIELD)),
        Some(Value::String(text)) if text.trim().is_empty() => {
            return Err(ValidationError::MissingField(PRINCIPAL_ID_FIELD));
        }
        Some(value) => value,
    };

    let content = object
        .get(CONTENT_FIELD)
        .cloned()
        .ok_or(ValidationError::MissingField(CONTENT_FIELD))?;

    let principal_id = coerce_principal_id(raw_principal)?;

    Ok(IngestRequest {
        principal_id,
        content,
    })
}

/// Best-effort numeric coercion of an untrusted principal id.
///
/// Numbers pass through, strings are parsed after trimming (decimal,
/// exponent and `0x`/`0o`/`0b` forms of any length) and `null` or an empty
/// string map to `0`. Booleans, arrays, objects and anything that lands on a
/// non-finite value are rejected; finite values outside the store's number
/// range are rejected separately.
pub fn coerce_principal_id(raw: &Value) -> Result<PrincipalId, ValidationError> {
    let coerced = match raw {
        Value::Null => Some(0.0),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_numeric_text(text.trim()),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };

    let value = coerced
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::NonNumericPrincipalId(raw.to_string()))?;
    PrincipalId::new(value).ok_or_else(|| ValidationError::PrincipalIdOutOfRange(raw.to_string()))
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    if text.is_empty() {
        return Some(0.0);
    }

    for (prefixes, radix) in [(["0x", "0X"], 16), (["0o", "0O"], 8), (["0b", "0B"], 2)] {
        if let Some(digits) = strip_any_prefix(text, &prefixes) {
            return parse_radix_digits(digits, radix);
        }
    }

    // Rust also accepts "inf"/"nan" spellings; those are filtered as non-finite.
    text.parse::<f64>().ok()
}

/// Accumulates into `f64` so long literals keep their magnitude instead of
/// overflowing an integer type.
fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |total, digit| {
        digit
            .to_digit(radix)
            .map(|digit| total * f64::from(radix) + f64::from(digit))
    })
}

fn strip_any_prefix<'a>(text: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find_map(|prefix| text.strip_prefix(*prefix))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn principal(value: Value) -> Result<f64, ValidationError> {
        coerce_principal_id(&value).map(PrincipalId::value)
    }

    #[test]
    fn accepts_numeric_principal_and_object_content() {
        let request = validate_ingest_payload(&json!({"principalId": 42, "content": {"a": 1}}))
            .expect("payload should validate");

        assert_eq!(request.principal_id.value(), 42.0);
        assert_eq!(request.content, json!({"a": 1}));
    }

    #[test]
    fn rejects_non_object_payloads() {
        for payload in [json!(null), json!([1, 2]), json!("text"), json!(5)] {
            assert_eq!(
                validate_ingest_payload(&payload),
                Err(ValidationError::NotAnObject)
            );
        }
    }

    #[test]
    fn rejects_missing_or_blank_principal_id() {
        for payload in [
            json!({"content": "x"}),
            json!({"principalId": null, "content": "x"}),
            json!({"principalId": "   ", "content": "x"}),
        ] {
            assert_eq!(
                validate_ingest_payload(&payload),
                Err(ValidationError::MissingField(PRINCIPAL_ID_FIELD))
            );
        }
    }

    #[test]
    fn rejects_missing_content() {
        assert_eq!(
            validate_ingest_payload(&json!({"principalId": 1})),
            Err(ValidationError::MissingField(CONTENT_FIELD))
        );
    }

    #[test]
    fn falsy_content_values_are_present() {
        for content in [json!(null), json!(0), json!(""), json!(false)] {
            let request =
                validate_ingest_payload(&json!({"principalId": 3, "content": content.clone()}))
                    .expect("falsy content should be accepted");
            assert_eq!(request.content, content);
        }
    }

    #[test]
    fn zero_principal_id_is_accepted() {
        let request = validate_ingest_payload(&json!({"principalId": 0, "content": "x"}))
            .expect("zero should be a valid principal");
        assert_eq!(request.principal_id.value(), 0.0);
    }

    #[test]
    fn non_numeric_principal_id_is_rejected_explicitly() {
        let error = validate_ingest_payload(&json!({"principalId": "abc", "content": "x"}))
            .expect_err("non-numeric principal should fail");
        assert!(matches!(error, ValidationError::NonNumericPrincipalId(_)));
    }

    #[test]
    fn coercion_follows_numeric_conversion_rules() {
        assert_eq!(principal(json!(" 17 ")), Ok(17.0));
        assert_eq!(principal(json!("1e3")), Ok(1000.0));
        assert_eq!(principal(json!("0x1F")), Ok(31.0));
        assert_eq!(principal(json!("0b101")), Ok(5.0));
        assert_eq!(principal(json!(null)), Ok(0.0));
        assert_eq!(principal(json!("")), Ok(0.0));
        assert_eq!(principal(json!(2.5)), Ok(2.5));
    }

    #[test]
    fn radix_literals_wider_than_64_bits_keep_their_value() {
        assert_eq!(
            principal(json!("0x10000000000000000")),
            Ok(18_446_744_073_709_551_616.0)
        );
        assert_eq!(principal(json!("0o7")), Ok(7.0));
        assert!(principal(json!("0x")).is_err());
        assert!(principal(json!("0b102")).is_err());
    }

    #[test]
    fn boolean_principal_id_is_rejected() {
        for flag in [json!(true), json!(false)] {
            let error = validate_ingest_payload(&json!({"principalId": flag, "content": "x"}))
                .expect_err("booleans are not identifiers");
            assert!(matches!(error, ValidationError::NonNumericPrincipalId(_)));
        }
    }

    #[test]
    fn magnitudes_outside_store_range_are_rejected() {
        for raw in [json!(1e300), json!(-1e126), json!("1e-200")] {
            assert!(
                matches!(
                    coerce_principal_id(&raw),
                    Err(ValidationError::PrincipalIdOutOfRange(_))
                ),
                "{raw} should be out of range"
            );
        }
        assert_eq!(principal(json!(9.9e125)), Ok(9.9e125));
    }

    #[test]
    fn coercion_rejects_non_finite_and_structured_values() {
        for raw in [
            json!("NaN"),
            json!("Infinity"),
            json!("inf"),
            json!("12abc"),
            json!([1]),
            json!({"id": 1}),
        ] {
            assert!(
                matches!(
                    coerce_principal_id(&raw),
                    Err(ValidationError::NonNumericPrincipalId(_))
                ),
                "{raw} should not coerce"
            );
        }
    }
}
