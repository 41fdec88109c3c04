//! Error handling for the API client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The response body was not the JSON shape the dashboard expects.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Network error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http { status, message }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }

    /// Short text suitable for an inline error line.
    ///
    /// FastAPI wraps error text as `{"detail": "..."}`; that detail is shown
    /// instead of the raw body when present.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Http { status, message } => {
                let detail = serde_json::from_str::<serde_json::Value>(message)
                    .ok()
                    .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from));
                match detail {
                    Some(detail) => format!("HTTP {}: {}", status, detail),
                    None if message.is_empty() => format!("HTTP {}", status),
                    None => format!("HTTP {}: {}", status, message),
                }
            }
            other => other.to_string(),
        }
    }
}
