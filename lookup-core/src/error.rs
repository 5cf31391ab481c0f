use hyper::ext::ReasonPhrase;
use thiserror::Error;

/// Everything that can end a lookup or submit attempt.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The identifier was empty after trimming.
    #[error("Invalid ID")]
    InvalidId,

    /// The backend answered with a non-2xx status.
    #[error("Error {code}: {reason}")]
    Status { code: u16, reason: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid endpoint URL '{0}'")]
    Url(String),
}

impl LookupError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// Like [`Self::from_status`], but prefers the reason phrase the server
    /// actually sent when it differs from the canonical one. An empty phrase
    /// (and HTTP/2, which has none) falls back to the canonical text.
    pub fn from_response(res: &reqwest::Response) -> Self {
        let status = res.status();
        match res.extensions().get::<ReasonPhrase>() {
            Some(phrase) if !phrase.as_bytes().is_empty() => Self::Status {
                code: status.as_u16(),
                reason: String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
            },
            _ => Self::from_status(status),
        }
    }

    /// Single-line message shown to the user.
    pub fn user_message(&self) -> String {
        message_or_unknown(self.to_string())
    }
}

/// Blank messages are replaced with "Unknown error".
pub fn message_or_unknown(msg: String) -> String {
    if msg.trim().is_empty() { "Unknown error".to_string() } else { msg }
}
