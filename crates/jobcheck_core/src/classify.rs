use serde_json::Value;

use crate::ResultKind;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter job details in the textarea.";
pub const LOADING_MESSAGE: &str = "Analyzing job posting...";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired — please login again.";
pub const SESSION_REDIRECT_MESSAGE: &str =
    "Session expired or redirect occurred — please login again.";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected server response. Check console.";
pub const MISSING_PREDICTION_MESSAGE: &str = "No prediction returned from server.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error while contacting server.";

const FAKE_MARKERS: [&str; 2] = ["fake", "fraud"];
const REAL_MARKERS: [&str; 3] = ["real", "genuine", "ham"];

/// What the server said, reduced to the cases the form distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseClass {
    /// Transport followed a redirect, typically to the login page.
    Redirected,
    /// Body is a markup document rather than JSON.
    Markup,
    Malformed,
    ServerError(String),
    Prediction { label: String, kind: ResultKind },
    MissingPrediction,
}

/// Classifies a completed response. First matching rule wins.
pub fn classify_response(redirected: bool, body: &str) -> ResponseClass {
    if redirected {
        return ResponseClass::Redirected;
    }
    if body.trim_start().starts_with('<') {
        return ResponseClass::Markup;
    }
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(_) => return ResponseClass::Malformed,
    };
    if let Some(message) = data.get("error").and_then(field_text) {
        return ResponseClass::ServerError(message);
    }
    if let Some(label) = data.get("prediction").and_then(field_text) {
        let kind = classify_prediction(&label);
        return ResponseClass::Prediction { label, kind };
    }
    ResponseClass::MissingPrediction
}

/// Maps a prediction label to a badge kind by case-insensitive substring match.
pub fn classify_prediction(label: &str) -> ResultKind {
    let lowered = label.to_lowercase();
    if FAKE_MARKERS.iter().any(|m| lowered.contains(m)) {
        ResultKind::Fake
    } else if REAL_MARKERS.iter().any(|m| lowered.contains(m)) {
        ResultKind::Real
    } else {
        ResultKind::Info
    }
}

/// Text of a field that counts as set: non-empty strings, non-zero numbers,
/// `true`, and any array or object. `null`, `false`, `0` and `""` are unset.
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
