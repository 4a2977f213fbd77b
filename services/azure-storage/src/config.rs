use std::fmt::{Debug, Formatter};

use sassign_core::utils::Redact;
use sassign_core::Context;

use crate::constants::*;

/// Config carries the service principal and storage account settings.
///
/// Every field can be set explicitly; [`Config::from_env`] fills the ones
/// left unset from the environment.
#[derive(Clone, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Config {
    /// `tenant_id` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_TENANT_ID`]
    pub tenant_id: Option<String>,
    /// `client_id` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_ID`]
    pub client_id: Option<String>,
    /// `client_secret` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_SECRET`]
    pub client_secret: Option<String>,
    /// `authority_host` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_AUTHORITY_HOST`]
    /// - `https://login.microsoftonline.com` otherwise
    pub authority_host: Option<String>,
    /// `account_name` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_ACCOUNT_NAME`]
    pub account_name: Option<String>,
    /// `account_url` value will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_STORAGE_ACCOUNT_URL`]
    /// - `https://{account_name}.blob.core.windows.net` otherwise
    pub account_url: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .field("authority_host", &self.authority_host)
            .field("account_name", &self.account_name)
            .field("account_url", &self.account_url)
            .finish()
    }
}

impl Config {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tenant id.
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the client id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the client secret.
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the authority host.
    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = Some(authority_host.into());
        self
    }

    /// Set the storage account name.
    pub fn with_account_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = Some(account_name.into());
        self
    }

    /// Set the storage account url, for example `https://acct.blob.core.windows.net`.
    pub fn with_account_url(mut self, account_url: impl Into<String>) -> Self {
        self.account_url = Some(account_url.into());
        self
    }

    /// Load the fields left unset from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();
        let load = |field: &mut Option<String>, key: &str| {
            if field.is_none() {
                *field = envs.get(key).filter(|v| !v.is_empty()).cloned();
            }
        };

        load(&mut self.tenant_id, AZURE_TENANT_ID);
        load(&mut self.client_id, AZURE_CLIENT_ID);
        load(&mut self.client_secret, AZURE_CLIENT_SECRET);
        load(&mut self.authority_host, AZURE_AUTHORITY_HOST);
        load(&mut self.account_name, AZURE_STORAGE_ACCOUNT_NAME);
        load(&mut self.account_url, AZURE_STORAGE_ACCOUNT_URL);

        self
    }

    /// The authority host to request tokens from.
    pub fn authority_host(&self) -> &str {
        self.authority_host.as_deref().unwrap_or(AZURE_PUBLIC_CLOUD)
    }

    /// The blob service url of the storage account.
    pub fn account_url(&self) -> Option<String> {
        self.account_url.clone().or_else(|| {
            self.account_name
                .as_ref()
                .map(|name| format!("https://{name}.blob.core.windows.net"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sassign_core::StaticEnv;
    use std::collections::HashMap;

    fn ctx(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_from_env() {
        let ctx = ctx(&[
            (AZURE_TENANT_ID, "tenant"),
            (AZURE_CLIENT_ID, "client"),
            (AZURE_CLIENT_SECRET, "secret"),
            (AZURE_STORAGE_ACCOUNT_NAME, "acct"),
        ]);

        let config = Config::new().from_env(&ctx);
        assert_eq!(
            config,
            Config {
                tenant_id: Some("tenant".to_string()),
                client_id: Some("client".to_string()),
                client_secret: Some("secret".to_string()),
                authority_host: None,
                account_name: Some("acct".to_string()),
                account_url: None,
            }
        );
        assert_eq!(config.authority_host(), "https://login.microsoftonline.com");
        assert_eq!(
            config.account_url().as_deref(),
            Some("https://acct.blob.core.windows.net")
        );
    }

    #[test]
    fn test_explicit_fields_win_over_env() {
        let ctx = ctx(&[
            (AZURE_TENANT_ID, "env-tenant"),
            (AZURE_AUTHORITY_HOST, "https://login.microsoftonline.us"),
            (AZURE_STORAGE_ACCOUNT_URL, "http://127.0.0.1:10000/devstoreaccount1"),
        ]);

        let config = Config::new()
            .with_tenant_id("tenant")
            .with_account_name("acct")
            .from_env(&ctx);

        assert_eq!(config.tenant_id.as_deref(), Some("tenant"));
        assert_eq!(config.authority_host(), "https://login.microsoftonline.us");
        assert_eq!(
            config.account_url().as_deref(),
            Some("http://127.0.0.1:10000/devstoreaccount1")
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::new().with_client_secret("a-very-long-client-secret");
        let output = format!("{config:?}");
        assert!(!output.contains("a-very-long-client-secret"));
        assert!(output.contains("a-v***ret"));
    }
}
