//! Configuration loading and resolution.
//!
//! Every field resolves as CLI flag > environment variable > default.

use std::time::Duration;

use serde_json::json;
use url::Url;

use crate::error::{ProbeError, ProbeResult};
use crate::payload::{IngestRequest, Priority};

pub const ENV_ENDPOINT: &str = "INGEST_PROBE_ENDPOINT";
pub const ENV_TOKEN: &str = "INGEST_PROBE_TOKEN";
pub const ENV_TIMEOUT_MS: &str = "INGEST_PROBE_TIMEOUT_MS";
pub const ENV_INSECURE: &str = "INGEST_PROBE_INSECURE";

pub const DEFAULT_ENDPOINT: &str = "https://localhost:62787/api/v1/videos/ingest";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Whether TLS certificates presented by the endpoint are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrustPolicy {
    /// Validate the certificate chain and hostname.
    #[default]
    Verify,
    /// Accept any certificate. Only for local endpoints with self-signed certs.
    InsecureSkipVerify,
}

impl TrustPolicy {
    pub fn is_insecure(self) -> bool {
        matches!(self, TrustPolicy::InsecureSkipVerify)
    }

    fn as_str(self) -> &'static str {
        match self {
            TrustPolicy::Verify => "verify",
            TrustPolicy::InsecureSkipVerify => "insecure-skip-verify",
        }
    }
}

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--endpoint`.
    pub endpoint: Option<String>,
    /// `--token`.
    pub token: Option<String>,
    /// Video URL placed in the payload.
    pub video_url: String,
    /// `--priority`.
    pub priority: Option<Priority>,
    /// `--timeout`, in milliseconds.
    pub timeout_ms: Option<u64>,
    /// `--insecure`.
    pub insecure: bool,
}

/// Fully resolved probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Ingest endpoint URL (http or https).
    pub endpoint: Url,
    /// Bearer token sent in the Authorization header.
    pub token: String,
    /// Request body.
    pub payload: IngestRequest,
    /// Upper bound on the whole exchange.
    pub timeout: Duration,
    /// TLS certificate handling.
    pub trust: TrustPolicy,
}

impl ProbeConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> ProbeResult<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve using `env` to look up environment variables.
    pub fn resolve_with<F>(overrides: ConfigOverrides, env: F) -> ProbeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_raw = overrides
            .endpoint
            .or_else(|| env(ENV_ENDPOINT))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = parse_endpoint(&endpoint_raw)?;

        let token = overrides
            .token
            .or_else(|| env(ENV_TOKEN))
            .filter(|t| !t.trim().is_empty())
            .ok_or(ProbeError::MissingToken(ENV_TOKEN))?;

        let timeout_ms = match overrides.timeout_ms {
            Some(ms) => ms,
            None => match env(ENV_TIMEOUT_MS) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ProbeError::InvalidTimeout(format!("{ENV_TIMEOUT_MS}={raw}")))?,
                None => DEFAULT_TIMEOUT_MS,
            },
        };
        if timeout_ms == 0 {
            return Err(ProbeError::InvalidTimeout("must be greater than 0 ms".into()));
        }

        let insecure = overrides.insecure || env(ENV_INSECURE).as_deref().is_some_and(is_truthy);
        let trust = if insecure {
            TrustPolicy::InsecureSkipVerify
        } else {
            TrustPolicy::Verify
        };

        Ok(Self {
            endpoint,
            token,
            payload: IngestRequest::new(overrides.video_url, overrides.priority.unwrap_or_default()),
            timeout: Duration::from_millis(timeout_ms),
            trust,
        })
    }

    /// Resolved configuration with the token masked, for display.
    pub fn to_redacted_json(&self) -> serde_json::Value {
        json!({
            "endpoint": self.endpoint.as_str(),
            "token": redact(&self.token),
            "payload": self.payload,
            "timeout_ms": self.timeout.as_millis() as u64,
            "trust": self.trust.as_str(),
        })
    }
}

fn parse_endpoint(raw: &str) -> ProbeResult<Url> {
    let url = Url::parse(raw).map_err(|e| ProbeError::InvalidEndpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "https" | "http" => Ok(url),
        other => Err(ProbeError::InvalidEndpoint {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn redact(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if token.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
