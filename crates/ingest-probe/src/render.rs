//! Rendering of probe outcomes to a text sink.

use std::io::{self, Write};

use serde_json::{json, Value};

use crate::outcome::{ProbeOutcome, ResponseBody};

/// Section label printed above an error response body.
pub const ERROR_BODY_HEADER: &str = "=== ERROR RESPONSE BODY ===";

/// Output style selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

/// Write `outcome` to `out` in the requested mode.
pub fn render<W: Write>(outcome: &ProbeOutcome, mode: OutputMode, out: &mut W) -> io::Result<()> {
    match mode {
        OutputMode::Human => render_human(outcome, out),
        OutputMode::Json => {
            writeln!(out, "{}", pretty(&envelope(outcome)))
        }
    }
}

fn render_human<W: Write>(outcome: &ProbeOutcome, out: &mut W) -> io::Result<()> {
    match outcome {
        ProbeOutcome::Success { body, .. } => writeln!(out, "{}", pretty(body)),
        ProbeOutcome::HttpStatus { code, reason, body } => {
            writeln!(out, "HTTP Error {code}: {reason}")?;
            writeln!(out)?;
            writeln!(out, "{ERROR_BODY_HEADER}")?;
            match body {
                ResponseBody::Json(v) => writeln!(out, "{}", pretty(v)),
                ResponseBody::Raw(text) => writeln!(out, "{text}"),
            }
        }
        ProbeOutcome::Transport { message } => writeln!(out, "Error: {message}"),
        ProbeOutcome::Decode { raw, .. } => writeln!(out, "{raw}"),
    }
}

/// Machine-readable summary of an outcome.
pub fn envelope(outcome: &ProbeOutcome) -> Value {
    let (reason, body, message) = match outcome {
        ProbeOutcome::Success { body, .. } => (Value::Null, body.clone(), Value::Null),
        ProbeOutcome::HttpStatus { reason, body, .. } => {
            let body = match body {
                ResponseBody::Json(v) => v.clone(),
                ResponseBody::Raw(text) => Value::String(text.clone()),
            };
            (Value::String(reason.clone()), body, Value::Null)
        }
        ProbeOutcome::Transport { message } => {
            (Value::Null, Value::Null, Value::String(message.clone()))
        }
        ProbeOutcome::Decode { raw, .. } => (
            Value::Null,
            Value::String(raw.clone()),
            Value::String("response body is not valid JSON".into()),
        ),
    };

    json!({
        "ok": outcome.is_success(),
        "kind": outcome.kind(),
        "status": outcome.status(),
        "reason": reason,
        "body": body,
        "message": message,
    })
}

fn pretty(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}
