//! Error types for probe setup.
//!
//! Failures of the HTTP exchange itself are not errors here; they are
//! reported as [`ProbeOutcome`](crate::outcome::ProbeOutcome) variants.

/// Errors raised while preparing a probe, before any request is sent.
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    #[error("Missing bearer token: pass --token or set {0}")]
    MissingToken(&'static str),

    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Invalid priority '{0}': expected an integer or 'high'")]
    InvalidPriority(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ProbeResult<T> = Result<T, ProbeError>;
