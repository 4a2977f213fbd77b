use crate::constants::*;
use crate::key::key_info_xml;
use crate::provide_credential::ClientSecretCredentialProvider;
use crate::{BearerToken, Config, TokenCache, UserDelegationKey};
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};
use log::{debug, error, warn};
use sassign_core::time::{now, DateTime};
use sassign_core::{Context, Error, ErrorKind, Result};

/// DelegationKeyClient exchanges bearer tokens for user delegation keys.
///
/// A request rejected with `401 Unauthorized` is retried exactly once with a
/// force renewed token. Every other failure is returned as is.
#[derive(Debug, Clone)]
pub struct DelegationKeyClient {
    ctx: Context,
    token_cache: TokenCache,
    account_url: String,
}

impl DelegationKeyClient {
    /// Create a client for the storage account at `account_url`, for example
    /// `https://acct.blob.core.windows.net`.
    pub fn new(ctx: Context, token_cache: TokenCache, account_url: impl Into<String>) -> Self {
        Self {
            ctx,
            token_cache,
            account_url: account_url.into(),
        }
    }

    /// Create a client backed by [`ClientSecretCredentialProvider`].
    ///
    /// Fields left unset in `config` are loaded from env.
    pub fn from_config(ctx: Context, config: Config) -> Result<Self> {
        let config = config.from_env(&ctx);
        let account_url = config.account_url().ok_or_else(|| {
            Error::config_invalid("account_url or account_name must be set")
        })?;

        let provider = ClientSecretCredentialProvider::from_config(config);
        let token_cache = TokenCache::new(ctx.clone(), provider);
        Ok(Self::new(ctx, token_cache, account_url))
    }

    /// The token cache this client draws bearer tokens from.
    pub fn token_cache(&self) -> &TokenCache {
        &self.token_cache
    }

    /// Request a user delegation key valid within `[start, expiry]`.
    pub async fn request_delegation_key(
        &self,
        start: DateTime,
        expiry: DateTime,
    ) -> Result<UserDelegationKey> {
        let token = self.token_cache.get(false).await?;
        match self.send_request(&token, start, expiry).await {
            Err(err) if err.kind() == ErrorKind::Unauthorized => {
                warn!("delegation key request unauthorized, retrying with renewed token");
            }
            res => return res,
        }

        let token = self.token_cache.get(true).await?;
        match self.send_request(&token, start, expiry).await {
            Err(err) if err.kind() == ErrorKind::Unauthorized => {
                Err(Error::delegation_key_request_failed(StatusCode::UNAUTHORIZED)
                    .with_context(format!("account_url: {}", self.account_url))
                    .with_source(err))
            }
            res => res,
        }
    }

    /// Request a user delegation key valid from now until `expiry`.
    pub async fn request_delegation_key_until(
        &self,
        expiry: DateTime,
    ) -> Result<UserDelegationKey> {
        self.request_delegation_key(now(), expiry).await
    }

    async fn send_request(
        &self,
        token: &BearerToken,
        start: DateTime,
        expiry: DateTime,
    ) -> Result<UserDelegationKey> {
        let url = format!(
            "{}/?restype=service&comp=userdelegationkey",
            self.account_url.trim_end_matches('/')
        );
        let body = key_info_xml(start, expiry)?;

        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", token.access_token))?;
        authorization.set_sensitive(true);

        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(&url)
            .header(AUTHORIZATION, authorization)
            .header(X_MS_VERSION, STORAGE_SERVICE_VERSION)
            .header(CONTENT_TYPE, "application/xml")
            .body(Bytes::from(body))
            .map_err(|e| {
                Error::request_invalid("failed to build delegation key request").with_source(e)
            })?;

        debug!("requesting user delegation key from {url}");
        let resp = self.ctx.http_send_as_string(req).await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::unauthorized("delegation key request rejected the bearer token"));
        }
        if !status.is_success() {
            error!(
                "delegation key request failed with status {status}: {}",
                resp.body()
            );
            return Err(Error::delegation_key_request_failed(status)
                .with_context(format!("account_url: {}", self.account_url)));
        }

        let key = UserDelegationKey::from_xml(resp.body())?;
        debug!(
            "user delegation key acquired, valid until {}",
            key.signed_expiry
        );
        Ok(key)
    }
}
