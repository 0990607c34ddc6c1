//! Single-shot HTTP probe against the ingest endpoint.
//!
//! Sends exactly one POST and classifies what came back. No retries: the
//! point is to see what the endpoint does with one request.

use std::error::Error as StdError;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info, warn};

use crate::config::ProbeConfig;
use crate::error::ProbeResult;
use crate::outcome::{ProbeOutcome, ResponseBody};

/// HTTP client bound to one resolved configuration.
pub struct IngestProbe {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl IngestProbe {
    /// Build the underlying client. Fails only if the TLS backend cannot be set up.
    pub fn new(config: ProbeConfig) -> ProbeResult<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("ingest-probe/", env!("CARGO_PKG_VERSION")));

        if config.trust.is_insecure() {
            warn!(
                endpoint = %config.endpoint,
                "TLS certificate verification is DISABLED for this probe"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Send the ingest request and classify the result.
    ///
    /// Only payload serialization can fail; exchange errors come back as
    /// outcome variants. The response is owned here and dropped before
    /// returning, which releases the connection on every path.
    pub async fn send(&self) -> ProbeResult<ProbeOutcome> {
        let body = self.config.payload.to_json_bytes()?;
        debug!(
            endpoint = %self.config.endpoint,
            bytes = body.len(),
            "POST ingest request"
        );

        let sent = self
            .client
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .body(body)
            .send()
            .await;

        let resp = match sent {
            Ok(r) => r,
            Err(e) => {
                debug!("transport failure: {e:?}");
                return Ok(ProbeOutcome::Transport {
                    message: error_chain(&e),
                });
            }
        };

        let status = resp.status();
        info!(status = status.as_u16(), "ingest endpoint responded");

        // hyper only records the phrase when it differs from the canonical one.
        let reason = resp
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|rp| String::from_utf8_lossy(rp.as_bytes()).into_owned())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "Unknown".to_string());

        let bytes = match resp.bytes().await {
            Ok(b) => b,
            Err(e) => {
                return Ok(ProbeOutcome::Transport {
                    message: error_chain(&e),
                })
            }
        };

        if status.is_success() {
            return Ok(match ResponseBody::classify(&bytes) {
                ResponseBody::Json(body) => ProbeOutcome::Success {
                    status: status.as_u16(),
                    body,
                },
                ResponseBody::Raw(raw) => {
                    warn!(
                        status = status.as_u16(),
                        "success response body is not valid JSON"
                    );
                    ProbeOutcome::Decode {
                        status: status.as_u16(),
                        raw,
                    }
                }
            });
        }

        Ok(ProbeOutcome::HttpStatus {
            code: status.as_u16(),
            reason,
            body: ResponseBody::classify(&bytes),
        })
    }
}

/// Resolve the configuration's client and send one probe.
pub async fn run(config: ProbeConfig) -> ProbeResult<ProbeOutcome> {
    IngestProbe::new(config)?.send().await
}

/// Render an error and its sources as `outer: inner: root`.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrustPolicy;
    use crate::payload::{IngestRequest, Priority};
    use std::time::Duration;

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl std::fmt::Display for Layer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.1.as_deref().map(|l| l as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn test_error_chain_joins_sources() {
        let err = Layer(
            "error sending request",
            Some(Box::new(Layer(
                "tcp connect error",
                Some(Box::new(Layer("Connection refused (os error 111)", None))),
            ))),
        );
        assert_eq!(
            error_chain(&err),
            "error sending request: tcp connect error: Connection refused (os error 111)"
        );
    }

    #[test]
    fn test_insecure_client_builds() {
        let config = ProbeConfig {
            endpoint: "https://localhost:62787/api/v1/videos/ingest".parse().unwrap(),
            token: "mock-token".into(),
            payload: IngestRequest::new("https://v/1", Priority::HIGH),
            timeout: Duration::from_secs(1),
            trust: TrustPolicy::InsecureSkipVerify,
        };
        assert!(IngestProbe::new(config).is_ok());
    }
}
