use bytes::Bytes;
use http::{Request, Response, StatusCode};
use sassign_core::{Error, HttpSend, Result};
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};

type Responder = dyn Fn(&Request<Bytes>) -> (StatusCode, String) + Send + Sync;
type Matcher = dyn Fn(&Request<Bytes>) -> bool + Send + Sync;

/// MockHttpSend answers every request with a scripted response and
/// records what was sent.
#[derive(Clone)]
pub struct MockHttpSend {
    responder: Arc<Responder>,
    fail_when: Option<Arc<Matcher>>,
    requests: Arc<Mutex<Vec<Request<Bytes>>>>,
}

impl Debug for MockHttpSend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHttpSend").finish_non_exhaustive()
    }
}

impl MockHttpSend {
    pub fn new(
        responder: impl Fn(&Request<Bytes>) -> (StatusCode, String) + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Arc::new(responder),
            fail_when: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail matching requests at the transport level instead of answering.
    pub fn fail_when(
        mut self,
        matcher: impl Fn(&Request<Bytes>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.fail_when = Some(Arc::new(matcher));
        self
    }

    /// All requests sent so far, in order.
    pub fn requests(&self) -> Vec<Request<Bytes>> {
        self.requests.lock().unwrap().iter().map(clone_request).collect()
    }

    /// Requests whose path ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<Request<Bytes>> {
        self.requests()
            .into_iter()
            .filter(|req| req.uri().path().ends_with(suffix))
            .collect()
    }
}

fn clone_request(req: &Request<Bytes>) -> Request<Bytes> {
    let mut cloned = Request::builder()
        .method(req.method().clone())
        .uri(req.uri().clone())
        .body(req.body().clone())
        .unwrap();
    *cloned.headers_mut() = req.headers().clone();
    cloned
}

#[async_trait::async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let failed = self.fail_when.as_ref().is_some_and(|f| f(&req));
        let (status, body) = (self.responder)(&req);
        let uri = req.uri().to_string();
        self.requests.lock().unwrap().push(req);
        if failed {
            return Err(Error::unexpected("failed to send http request")
                .with_context(format!("uri: {uri}")));
        }
        Ok(Response::builder()
            .status(status)
            .body(Bytes::from(body))
            .unwrap())
    }
}

pub const TOKEN_RESPONSE: &str =
    r#"{"token_type":"Bearer","expires_in":3599,"ext_expires_in":3599,"access_token":"test-access-token"}"#;

pub const DELEGATION_KEY_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<UserDelegationKey>
    <SignedOid>00000000-0000-0000-0000-000000000000</SignedOid>
    <SignedTid>11111111-1111-1111-1111-111111111111</SignedTid>
    <SignedStart>2024-01-01T00:00:00Z</SignedStart>
    <SignedExpiry>2024-01-02T00:00:00Z</SignedExpiry>
    <SignedService>b</SignedService>
    <SignedVersion>2022-11-02</SignedVersion>
    <Value>c2VjcmV0LWtleS1ieXRlcw==</Value>
</UserDelegationKey>"#;
