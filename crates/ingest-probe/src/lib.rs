//! Ingest probe — send one request to the video ingest API and report the outcome.
//!
//! The library target exists so integration tests can drive the probe
//! against a mock endpoint; the `ingest-probe` binary is the real surface.

pub mod config;
pub mod error;
pub mod outcome;
pub mod payload;
pub mod probe;
pub mod render;

pub use config::{ConfigOverrides, ProbeConfig, TrustPolicy};
pub use error::{ProbeError, ProbeResult};
pub use outcome::{ProbeOutcome, ResponseBody};
pub use payload::{IngestRequest, Priority};
pub use probe::IngestProbe;
pub use render::{render, OutputMode};
