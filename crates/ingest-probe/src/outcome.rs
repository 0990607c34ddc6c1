//! Classified result of a single probe exchange.

use serde_json::Value;

/// A response body, parsed as JSON when possible.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// Body that did not parse as JSON, kept verbatim (lossy UTF-8).
    Raw(String),
}

impl ResponseBody {
    /// Try JSON first, fall back to the raw text.
    pub fn classify(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(v) => ResponseBody::Json(v),
            Err(_) => ResponseBody::Raw(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// What happened when the probe was sent.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// 2xx with a JSON body.
    Success {
        /// HTTP status code.
        status: u16,
        /// Parsed response body.
        body: Value,
    },
    /// The server answered with a non-2xx status.
    HttpStatus {
        /// HTTP status code.
        code: u16,
        /// Reason phrase sent by the server, or the canonical one.
        reason: String,
        /// Error body, JSON when it parses.
        body: ResponseBody,
    },
    /// The exchange never completed (connect, DNS, TLS, timeout, body read).
    Transport {
        /// Underlying error with its source chain.
        message: String,
    },
    /// 2xx, but the body is not JSON.
    Decode {
        /// HTTP status code.
        status: u16,
        /// Body text as received.
        raw: String,
    },
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeOutcome::Success { .. } => "success",
            ProbeOutcome::HttpStatus { .. } => "http_status",
            ProbeOutcome::Transport { .. } => "transport",
            ProbeOutcome::Decode { .. } => "decode",
        }
    }

    /// HTTP status code, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeOutcome::Success { status, .. } | ProbeOutcome::Decode { status, .. } => {
                Some(*status)
            }
            ProbeOutcome::HttpStatus { code, .. } => Some(*code),
            ProbeOutcome::Transport { .. } => None,
        }
    }

    /// Process exit code: 0 on success, 1 on every failure path.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
