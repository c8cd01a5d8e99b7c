//! Classification of service replies into session outcomes

use super::{ErrorBody, ProofStep};
use serde_json::Value;

/// Message reported when a successful reply carries no derivation
pub const EMPTY_RESPONSE: &str = "Empty response";

/// The terminal result of one request.
///
/// Exactly one outcome is produced per submitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Status 200 with a list of steps
    Success(Vec<ProofStep>),

    /// Status 500 with an error message and the steps derived so far
    Partial { steps: Vec<ProofStep>, info: String },

    /// Empty 200 reply, or a non-200 reply without usable steps
    Failure(String),

    /// Transport or decoding failure before a structured reply was obtained
    NetworkError(String),
}

impl SessionOutcome {
    /// Steps to render, for outcomes that carry any
    pub fn steps(&self) -> Option<&[ProofStep]> {
        match self {
            SessionOutcome::Success(steps) | SessionOutcome::Partial { steps, .. } => Some(steps),
            SessionOutcome::Failure(_) | SessionOutcome::NetworkError(_) => None,
        }
    }

    /// Message to surface to the user, for outcomes that carry one
    pub fn message(&self) -> Option<&str> {
        match self {
            SessionOutcome::Success(_) => None,
            SessionOutcome::Partial { info, .. } => Some(info),
            SessionOutcome::Failure(info) | SessionOutcome::NetworkError(info) => Some(info),
        }
    }

    /// Prefix put in front of the message wherever it is shown to the user
    pub fn notice_prefix(&self) -> &'static str {
        match self {
            SessionOutcome::NetworkError(_) => "Fetch error: ",
            _ => "Info: ",
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            SessionOutcome::Success(_) => "success",
            SessionOutcome::Partial { .. } => "partial",
            SessionOutcome::Failure(_) => "failure",
            SessionOutcome::NetworkError(_) => "network-error",
        }
    }
}

/// Map an HTTP status and raw body onto a [`SessionOutcome`].
///
/// - 200 with an empty body, `null`, or the string `"null"`: empty response
/// - 200 with an array: the steps, in array order
/// - non-200: the `info` message, plus the partial steps on status 500
/// - anything that does not decode: a network error
pub fn classify(status: u16, body: &[u8]) -> SessionOutcome {
    if status == 200 {
        classify_success(body)
    } else {
        classify_error(status, body)
    }
}

fn classify_success(body: &[u8]) -> SessionOutcome {
    if is_blank(body) {
        return SessionOutcome::Failure(EMPTY_RESPONSE.to_string());
    }

    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => return SessionOutcome::NetworkError(format!("malformed response: {}", e)),
    };

    match value {
        Value::Null => SessionOutcome::Failure(EMPTY_RESPONSE.to_string()),
        Value::String(ref s) if s == "null" => SessionOutcome::Failure(EMPTY_RESPONSE.to_string()),
        Value::Array(_) => match serde_json::from_value::<Vec<ProofStep>>(value) {
            Ok(steps) => SessionOutcome::Success(steps),
            Err(e) => SessionOutcome::NetworkError(format!("malformed step list: {}", e)),
        },
        other => SessionOutcome::NetworkError(format!(
            "expected a list of steps, got {}",
            describe(&other)
        )),
    }
}

fn classify_error(status: u16, body: &[u8]) -> SessionOutcome {
    if is_blank(body) {
        return SessionOutcome::Failure(format!("HTTP {}", status));
    }

    let reply: ErrorBody = match serde_json::from_slice(body) {
        Ok(reply) => reply,
        Err(e) => {
            return SessionOutcome::NetworkError(format!(
                "malformed error response (HTTP {}): {}",
                status, e
            ))
        }
    };

    let info = reply.info.unwrap_or_else(|| format!("HTTP {}", status));
    match reply.result {
        Some(steps) if status == 500 => SessionOutcome::Partial { steps, info },
        _ => SessionOutcome::Failure(info),
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_prefix() {
        assert_eq!(
            SessionOutcome::NetworkError("refused".to_string()).notice_prefix(),
            "Fetch error: "
        );
        assert_eq!(classify(200, b"null").notice_prefix(), "Info: ");
        assert_eq!(classify(400, b"{}").notice_prefix(), "Info: ");
    }

    #[test]
    fn test_null_body_is_empty_response() {
        assert_eq!(
            classify(200, b"null"),
            SessionOutcome::Failure(EMPTY_RESPONSE.to_string())
        );
        assert_eq!(
            classify(200, br#""null""#),
            SessionOutcome::Failure(EMPTY_RESPONSE.to_string())
        );
        assert_eq!(
            classify(200, b" \n"),
            SessionOutcome::Failure(EMPTY_RESPONSE.to_string())
        );
    }

    #[test]
    fn test_array_body_is_success_in_order() {
        let body = br#"[{"name":"R1","left":"A","right":"B","just":"ax"},
                        {"name":"R2","left":"B","right":"C","just":"ax"}]"#;
        let outcome = classify(200, body);
        assert_eq!(
            outcome,
            SessionOutcome::Success(vec![
                ProofStep::new("R1", "A", "B", "ax"),
                ProofStep::new("R2", "B", "C", "ax"),
            ])
        );
    }

    #[test]
    fn test_empty_array_is_success() {
        assert_eq!(classify(200, b"[]"), SessionOutcome::Success(vec![]));
    }

    #[test]
    fn test_object_on_200_is_network_error() {
        assert!(matches!(
            classify(200, br#"{"info":"?"}"#),
            SessionOutcome::NetworkError(_)
        ));
    }

    #[test]
    fn test_partial_on_500() {
        let body = br#"{"info":"timeout in branch 3","result":[{"name":"R1","left":"A","right":"B","just":"modus ponens"}]}"#;
        assert_eq!(
            classify(500, body),
            SessionOutcome::Partial {
                steps: vec![ProofStep::new("R1", "A", "B", "modus ponens")],
                info: "timeout in branch 3".to_string(),
            }
        );
    }

    #[test]
    fn test_500_with_null_result_is_failure() {
        assert_eq!(
            classify(500, br#"{"info":"error solving: bad","result":null}"#),
            SessionOutcome::Failure("error solving: bad".to_string())
        );
    }

    #[test]
    fn test_result_ignored_outside_500() {
        assert_eq!(
            classify(400, br#"{"info":"Bad formulas","result":[]}"#),
            SessionOutcome::Failure("Bad formulas".to_string())
        );
    }

    #[test]
    fn test_error_without_info_uses_status() {
        assert_eq!(
            classify(404, b"{}"),
            SessionOutcome::Failure("HTTP 404".to_string())
        );
        assert_eq!(
            classify(502, b""),
            SessionOutcome::Failure("HTTP 502".to_string())
        );
    }

    #[test]
    fn test_garbage_is_network_error() {
        assert!(matches!(
            classify(200, b"<html>"),
            SessionOutcome::NetworkError(_)
        ));
        assert!(matches!(
            classify(500, b"Internal Server Error"),
            SessionOutcome::NetworkError(_)
        ));
    }
}
