use reqwest::Response;
use serde::Deserialize;
use tracing::error;

use crate::error::{NanobrushError, Result};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Convert a reqwest send failure into a NanobrushError.
///
/// Timeouts keep their own variant; every other transport failure is reported
/// with a generic connectivity message.
pub fn handle_http_error(e: reqwest::Error, provider_name: &str) -> NanobrushError {
    error!(error = %e, "HTTP request to {} failed", provider_name);
    if e.is_timeout() {
        NanobrushError::Timeout
    } else {
        NanobrushError::Network
    }
}

/// Build the error for a non-success status from the raw response body.
///
/// Prefers `error.message` from a JSON error body and falls back to a
/// status-derived message.
pub fn api_error_from_body(status: u16, body: &str) -> NanobrushError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status));
    NanobrushError::Api { status, message }
}

/// Check HTTP response status and extract error message if unsuccessful.
pub async fn check_response_status(response: Response, provider_name: &str) -> Result<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        error!(
            status = %status,
            error = %error_text,
            "{} API returned error response", provider_name
        );
        return Err(api_error_from_body(status.as_u16(), &error_text));
    }
    Ok(response)
}

/// Read the JSON body of a successful response.
pub async fn read_json_body(response: Response, provider_name: &str) -> Result<serde_json::Value> {
    response.json().await.map_err(|e| {
        error!(error = %e, "Failed to parse JSON response from {}", provider_name);
        NanobrushError::Unknown(format!("could not read {} response: {}", provider_name, e))
    })
}
