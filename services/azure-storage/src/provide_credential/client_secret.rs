// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::STORAGE_SCOPE;
use crate::{BearerToken, Config};
use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error};
use sassign_core::{Context, Error, ProvideCredential, Result};
use serde::Deserialize;

/// Load bearer tokens through the Azure AD client credentials flow.
///
/// Every call exchanges the client id and secret for a new token scoped to
/// `https://storage.azure.com/.default`. Caching is left to
/// [`TokenCache`](crate::TokenCache).
///
/// Reference: <https://learn.microsoft.com/en-us/azure/active-directory/develop/v2-oauth2-client-creds-grant-flow>
#[derive(Debug, Default, Clone)]
pub struct ClientSecretCredentialProvider {
    config: Config,
}

impl ClientSecretCredentialProvider {
    /// Create a new client secret provider, every field is loaded from env.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new client secret provider from config.
    ///
    /// Fields left unset in `config` are still loaded from env.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the tenant ID.
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.config.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the client ID.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = Some(client_id.into());
        self
    }

    /// Set the client secret.
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.config.client_secret = Some(client_secret.into());
        self
    }

    /// Set the authority host, for example `https://login.microsoftonline.us`.
    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.config.authority_host = Some(authority_host.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for ClientSecretCredentialProvider {
    type Credential = BearerToken;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = self.config.clone().from_env(ctx);

        let (Some(tenant_id), Some(client_id), Some(client_secret)) = (
            config.tenant_id.as_deref(),
            config.client_id.as_deref(),
            config.client_secret.as_deref(),
        ) else {
            debug!("client secret credential is not configured, skipping");
            return Ok(None);
        };

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            config.authority_host().trim_end_matches('/'),
            tenant_id
        );

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("client_id", client_id)
            .append_pair("client_secret", client_secret)
            .append_pair("scope", STORAGE_SCOPE)
            .finish();

        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(&url)
            .header(
                http::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Bytes::from(body))
            .map_err(|e| {
                Error::request_invalid("failed to build token request").with_source(e)
            })?;

        debug!("requesting access token from {url}");
        let resp = ctx.http_send_as_string(req).await?;

        if !resp.status().is_success() {
            let status = resp.status();
            error!(
                "token request failed with status {status}: {}",
                resp.body()
            );
            return Err(Error::token_request_failed(status).with_context(format!("url: {url}")));
        }

        let token: TokenResponse = serde_json::from_str(resp.body()).map_err(|e| {
            Error::unexpected("failed to parse token response").with_source(e)
        })?;

        let token = BearerToken::from_expires_in(
            token.access_token,
            token.token_type,
            token.expires_in,
        );
        debug!("access token acquired, expires at {}", token.expires_at);
        Ok(Some(token))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token_type: String,
    expires_in: i64,
    access_token: String,
}
