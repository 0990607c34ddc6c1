//! Request payload for the ingest endpoint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, ProbeResult};

/// Ingest priority. Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub i64);

impl Priority {
    pub const HIGH: Priority = Priority(2);
}

impl Default for Priority {
    fn default() -> Self {
        Priority::HIGH
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("high") {
            return Ok(Priority::HIGH);
        }
        trimmed
            .parse::<i64>()
            .map(Priority)
            .map_err(|_| ProbeError::InvalidPriority(s.to_string()))
    }
}

/// Body of `POST /api/v1/videos/ingest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Video resource locator to ingest.
    pub url: String,
    pub priority: Priority,
}

impl IngestRequest {
    pub fn new(url: impl Into<String>, priority: Priority) -> Self {
        Self {
            url: url.into(),
            priority,
        }
    }

    /// Serialize to the UTF-8 JSON bytes sent on the wire.
    pub fn to_json_bytes(&self) -> ProbeResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
