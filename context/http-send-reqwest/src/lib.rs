//! Reqwest-based HTTP sending implementation for sassign.
//!
//! `ReqwestHttpSend` implements the `HttpSend` trait from `sassign_core` on top
//! of a `reqwest::Client`. The default client gives up on a request after
//! [`DEFAULT_TIMEOUT`]; pass your own client to [`ReqwestHttpSend::new`] for a
//! different transport policy.
//!
//! ```no_run
//! use sassign_core::{Context, OsEnv};
//! use sassign_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::{debug, warn};
use reqwest::{Client, Request};
use sassign_core::{Error, HttpSend, Result};
use std::time::Duration;

/// Timeout applied to every request sent by the default client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HttpSend implementation backed by reqwest.
#[derive(Debug)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl Default for ReqwestHttpSend {
    /// Build a client with [`DEFAULT_TIMEOUT`].
    ///
    /// If that client can't be built, reqwest's default client is used
    /// instead and requests are no longer bounded by a timeout. A warning
    /// is logged when that happens.
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = match Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(err) => {
                warn!("failed to build http client with timeout {timeout:?}, requests will not time out: {err}");
                Client::default()
            }
        };
        Self { client }
    }

    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let uri = req.uri().to_string();
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert http request").with_source(e))?;

        debug!("sending {} {}", req.method(), req.url());
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "http request timed out"
                } else {
                    "failed to send http request"
                };
                Error::unexpected(message)
                    .with_source(e)
                    .with_context(format!("uri: {uri}"))
            })?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| {
                Error::unexpected("failed to read http response body")
                    .with_source(e)
                    .with_context(format!("uri: {uri}"))
            })?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sassign_core::ErrorKind;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_request_times_out() {
        // Accept connections and never answer.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut conns = Vec::new();
            while let Ok((conn, _)) = listener.accept().await {
                conns.push(conn);
            }
        });

        let http = ReqwestHttpSend::with_timeout(Duration::from_millis(200));
        let req = http::Request::builder()
            .uri(format!("http://{addr}/"))
            .body(Bytes::new())
            .unwrap();

        let err = http.http_send(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(err.to_string().contains("http request timed out"));
    }
}
