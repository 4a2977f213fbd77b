//! Azure Storage user delegation SAS
//!
//! This crate issues user delegation shared access signatures for Azure Blob Storage:
//! - Bearer token acquisition through the Azure AD client credentials flow
//! - User delegation key acquisition, retried once on `401 Unauthorized`
//! - Pure, deterministic SAS url construction
//!
//! # Example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use sassign_azure_storage::{Config, DelegationKeyClient, SasPermission, SasSigner, SigningRequest};
//! use sassign_core::{Context, OsEnv};
//! use sassign_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Tenant, client and account settings are loaded from env.
//!     let client = DelegationKeyClient::from_config(ctx, Config::new())?;
//!     let key = client
//!         .request_delegation_key_until(chrono::Utc::now() + chrono::Duration::hours(1))
//!         .await?;
//!
//!     let req = SigningRequest::new("account", "container")
//!         .with_blob_name("path/to/blob")
//!         .with_permission(SasPermission::Read);
//!     let url = SasSigner::new().sign(&key, &req)?;
//!     println!("{url}");
//!
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::BearerToken;

mod provide_credential;
pub use provide_credential::*;

mod key;
pub use key::{SignedService, UserDelegationKey};

mod client;
pub use client::DelegationKeyClient;

mod sign_request;
pub use sign_request::{string_to_sign, SasPermission, SasSigner, SignedResource, SigningRequest};

/// TokenCache hands out bearer tokens, fetching at most one at a time.
pub type TokenCache = sassign_core::CredentialCache<BearerToken>;

#[cfg(test)]
mod mock;
