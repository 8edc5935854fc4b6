//! Error types shared by the gateway, the views and the player.
//!
//! Every remote failure reaches the views as an [`ApiError`]; views never
//! inspect raw response bodies themselves.

use std::collections::BTreeMap;

use thiserror::Error;

/// Fallback text when nothing more specific is known about a failure.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred.";

/// A failed call through the remote data gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend rejected the payload (field-level problems).
    #[error("validation failed: {}", .message.as_deref().unwrap_or("invalid data"))]
    Validation {
        message: Option<String>,
        fields: BTreeMap<String, Vec<String>>,
    },

    /// The bearer token is missing, expired or revoked.
    ///
    /// By the time a caller sees this the session has already been cleared.
    #[error("not authorized")]
    Unauthorized,

    /// Anything else: unexpected status codes or undecodable bodies.
    #[error("request failed{}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    Unknown {
        status: Option<u16>,
        message: Option<String>,
    },
}

impl ApiError {
    /// The most specific human readable explanation available.
    ///
    /// Order: field validation messages, then the server's message, then the
    /// transport error, then a generic fallback.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Validation { message, fields } => {
                let joined: Vec<&str> = fields
                    .values()
                    .flatten()
                    .map(String::as_str)
                    .filter(|m| !m.trim().is_empty())
                    .collect();
                if !joined.is_empty() {
                    joined.join(", ")
                } else {
                    non_empty(message.as_deref()).unwrap_or(UNKNOWN_ERROR).to_string()
                }
            }
            ApiError::Unknown { message, .. } => {
                non_empty(message.as_deref()).unwrap_or(UNKNOWN_ERROR).to_string()
            }
            ApiError::Network(msg) => {
                non_empty(Some(msg.as_str())).unwrap_or(UNKNOWN_ERROR).to_string()
            }
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Client-side form validation failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Title and audio file are required")]
    MissingTitle,
    #[error("Title and audio file are required")]
    MissingFile,
    #[error("File is too large ({size} bytes, limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("Unsupported audio file type: {0}")]
    UnsupportedFile(String),
    #[error("Audio file not found: {0}")]
    FileNotFound(String),
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Name is required")]
    MissingName,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Failures of the media subsystem. Only ever logged; the controller
/// degrades to the paused state.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output available: {0}")]
    Output(String),
    #[error("failed to fetch audio from {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to decode audio: {0}")]
    Decode(String),
    #[error("track has no audio source")]
    NoSource,
}

#[cfg(test)]
mod tests;
