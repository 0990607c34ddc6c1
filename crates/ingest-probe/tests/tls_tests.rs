//! Trust policy over a real TLS handshake with a self-signed certificate.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use assert_json_diff::assert_json_eq;
use rcgen::CertifiedKey;
use serde_json::json;
use tokio::net::TcpListener;
use tokio_rustls::rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio_rustls::rustls::{self, ServerConfig};
use tokio_rustls::TlsAcceptor;

use ingest_probe::{IngestProbe, IngestRequest, Priority, ProbeConfig, ProbeOutcome, TrustPolicy};

// ── helpers ──

/// HTTPS endpoint with a freshly generated self-signed certificate.
async fn spawn_self_signed_server() -> SocketAddr {
    let CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string(), "127.0.0.1".to_string()])
            .unwrap();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let server_config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![cert.der().clone()], key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(server_config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            // A verifying client aborts the handshake; keep serving.
            let Ok(mut tls) = acceptor.accept(stream).await else {
                continue;
            };
            let _ = common::respond(
                &mut tls,
                "HTTP/1.1 200 OK",
                r#"{"id": "abc123", "status": "queued"}"#,
            )
            .await;
        }
    });
    addr
}

fn config(addr: SocketAddr, trust: TrustPolicy) -> ProbeConfig {
    ProbeConfig {
        endpoint: format!("https://{addr}/api/v1/videos/ingest").parse().unwrap(),
        token: "mock-token".to_string(),
        payload: IngestRequest::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Priority::HIGH),
        timeout: Duration::from_secs(5),
        trust,
    }
}

async fn send(config: ProbeConfig) -> ProbeOutcome {
    IngestProbe::new(config).unwrap().send().await.unwrap()
}

// ── trust policy ──

#[tokio::test]
async fn test_verify_rejects_self_signed_certificate() {
    let addr = spawn_self_signed_server().await;

    let outcome = send(config(addr, TrustPolicy::Verify)).await;
    let ProbeOutcome::Transport { message } = &outcome else {
        panic!("expected transport error, got {outcome:?}");
    };
    assert!(!message.is_empty());
    assert_eq!(outcome.exit_code(), 1);
}

#[tokio::test]
async fn test_insecure_skip_verify_accepts_self_signed_certificate() {
    let addr = spawn_self_signed_server().await;

    let outcome = send(config(addr, TrustPolicy::InsecureSkipVerify)).await;
    match &outcome {
        ProbeOutcome::Success { status, body } => {
            assert_eq!(*status, 200);
            assert_json_eq!(body, json!({"id": "abc123", "status": "queued"}));
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(outcome.exit_code(), 0);
}

#[tokio::test]
async fn test_default_trust_policy_is_verify() {
    let addr = spawn_self_signed_server().await;

    let outcome = send(config(addr, TrustPolicy::default())).await;
    assert_eq!(outcome.kind(), "transport");
}
