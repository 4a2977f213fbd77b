//! Offline end to end flow, HTTP is served by a scripted sender.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use http::{Request, Response, StatusCode};
use pretty_assertions::assert_eq;
use sassign_azure_storage::{
    Config, DelegationKeyClient, SasPermission, SasSigner, SigningRequest,
};
use sassign_core::{Context, HttpSend, Result};

const TOKEN_RESPONSE: &str =
    r#"{"token_type":"Bearer","expires_in":3599,"access_token":"integration-token"}"#;

const DELEGATION_KEY_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?><UserDelegationKey><SignedOid>00000000-0000-0000-0000-000000000000</SignedOid><SignedTid>11111111-1111-1111-1111-111111111111</SignedTid><SignedStart>2024-01-01T00:00:00Z</SignedStart><SignedExpiry>2024-01-02T00:00:00Z</SignedExpiry><SignedService>b</SignedService><SignedVersion>2022-11-02</SignedVersion><Value>c2VjcmV0LWtleS1ieXRlcw==</Value></UserDelegationKey>"#;

#[derive(Debug, Default, Clone)]
struct ScriptedHttpSend {
    token_calls: Arc<AtomicUsize>,
    key_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl HttpSend for ScriptedHttpSend {
    async fn http_send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let body = if req.uri().path().ends_with("/oauth2/v2.0/token") {
            self.token_calls.fetch_add(1, Ordering::SeqCst);
            // Keep the fetch in flight long enough for callers to pile up.
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            TOKEN_RESPONSE
        } else {
            self.key_calls.fetch_add(1, Ordering::SeqCst);
            DELEGATION_KEY_RESPONSE
        };

        Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Bytes::from_static(body.as_bytes()))?)
    }
}

fn client(http: ScriptedHttpSend) -> DelegationKeyClient {
    let ctx = Context::new().with_http_send(http);
    let config = Config::new()
        .with_tenant_id("tenant")
        .with_client_id("client")
        .with_client_secret("secret")
        .with_account_name("acct");
    DelegationKeyClient::from_config(ctx, config).unwrap()
}

#[tokio::test]
async fn test_concurrent_requests_share_one_token() {
    let _ = env_logger::builder().is_test(true).try_init();

    let http = ScriptedHttpSend::default();
    let client = client(http.clone());
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let expiry = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.request_delegation_key(start, expiry).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(http.token_calls.load(Ordering::SeqCst), 1);
    assert_eq!(http.key_calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_key_to_signed_url() {
    let http = ScriptedHttpSend::default();
    let client = client(http);
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let expiry = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

    let key = client.request_delegation_key(start, expiry).await.unwrap();
    let req = SigningRequest::new("acct", "cont")
        .with_blob_name("file.txt")
        .with_permission(SasPermission::ReadWrite);
    let url = SasSigner::new().sign(&key, &req).unwrap();

    assert!(url.starts_with("https://acct.blob.core.windows.net/cont/file.txt?sr=b&sp=rw&"));
    assert!(url.contains("&sv=2022-11-02&"));
    assert!(url.ends_with("&sig=R1PoSRxNhDzvS6%2B6%2FBGevOGI7Kt%2BDlQNuLp8gQAg9iw%3D"));
}
