use serde_json::Value;
use thiserror::Error;

use crate::support::FetchError;

/// Transport-level failures of the back-office API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid tenant header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl ApiError {
    /// Build a `Status` error from a non-success response body.
    ///
    /// Uses the FastAPI `detail` field when present (a string, or the list of
    /// validation errors), then the raw body, then `HTTP <code>`.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let text = text.trim();

        let message = serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|value| detail_message(&value))
            .or_else(|| (!text.is_empty()).then(|| text.to_string()))
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self::Status { status, message }
    }
}

fn detail_message(value: &Value) -> Option<String> {
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(errors) => {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|error| error.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

impl From<ApiError> for FetchError {
    fn from(error: ApiError) -> Self {
        FetchError::new(error.to_string())
    }
}
