//! Backend error types and the assistant-visible text shown for each.

/// Shown in place of a reply when the backend cannot be reached.
pub const UNREACHABLE_REPLY: &str = "**Error:** Unable to connect to backend.";

/// Shown when the user cancels an in-flight request.
pub const CANCELLED_REPLY: &str = "*[Request cancelled]*";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Connection refused, DNS failure, timeout, or a broken response stream.
    #[error("could not reach backend: {0}")]
    Connect(#[source] reqwest::Error),
    #[error("backend returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("unexpected reply from backend: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request cancelled")]
    Cancelled,
}

impl BackendError {
    /// Text to record as the assistant's reply for this failure.
    pub fn reply_text(&self) -> String {
        match self {
            BackendError::Connect(_) => UNREACHABLE_REPLY.to_string(),
            BackendError::Status { status, detail } => {
                format!("**Error:** {} (HTTP {})", detail, status)
            }
            BackendError::Decode(_) => "**Error:** Unexpected reply from backend.".to_string(),
            BackendError::Cancelled => CANCELLED_REPLY.to_string(),
        }
    }
}

/// Build a status error from a non-2xx body. FastAPI puts the message in `{"detail": ...}`.
pub fn status_error(status: u16, body: &str) -> BackendError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").map(detail_text))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no details".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        });
    BackendError::Status { status, detail }
}

fn detail_text(detail: &serde_json::Value) -> String {
    match detail.as_str() {
        Some(s) => s.to_string(),
        None => detail.to_string(),
    }
}
