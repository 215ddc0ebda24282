use serde::Deserialize;
use serde_json::Value;

/// Where to go after a successful verification when the server names no target.
pub const DEFAULT_REDIRECT: &str = "/";

/// Failure reason used when the server gives none.
pub const DEFAULT_FAILURE_MESSAGE: &str = "unknown error";

/// Outcome of one submission. Every variant is terminal for that attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Success { redirect_target: String },
    Failure { message: String },
    /// The server has no enrolled reference face for this user.
    NotFound,
    /// The request never completed or the response could not be read.
    TransportError { detail: String },
}

impl VerificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, VerificationResult::Success { .. })
    }
}

/// Body of a verification response. Field types are not trusted: the
/// server relays whatever its matching service returned.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    redirect: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

// falsy values count as absent: null, false, 0, "", [] and {}
fn field_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn parse_object(body: &[u8]) -> Result<VerifyResponse, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom(format!(
            "expected a JSON object, got {value}"
        )));
    }
    VerifyResponse::deserialize(value)
}

/// Decode an HTTP status and body into a [`VerificationResult`].
///
/// 404 means "no enrolled face" regardless of the body. Any other status is
/// judged by the JSON body: `status == "success"` succeeds, every other
/// object fails. A body that is not a JSON object is a transport error.
pub fn decode_response(http_status: u16, body: &[u8]) -> VerificationResult {
    if http_status == 404 {
        return VerificationResult::NotFound;
    }

    let response = match parse_object(body) {
        Ok(response) => response,
        Err(e) => {
            return VerificationResult::TransportError {
                detail: format!("malformed response (HTTP {http_status}): {e}"),
            };
        }
    };

    if matches!(&response.status, Some(Value::String(s)) if s == "success") {
        // only a string can be navigated to
        let redirect_target = match response.redirect {
            Some(Value::String(target)) if !target.is_empty() => target,
            _ => DEFAULT_REDIRECT.to_string(),
        };
        VerificationResult::Success { redirect_target }
    } else {
        VerificationResult::Failure {
            message: field_text(response.message)
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        }
    }
}
