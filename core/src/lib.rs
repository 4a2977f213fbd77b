//! Core components for issuing delegated access signatures.
//!
//! This crate provides the foundational types and traits for the sassign ecosystem.
//! Service crates build on them to acquire tokens and keys and to sign with them.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Context**: A container that holds implementations for HTTP sending and environment access
//! - **Traits**: Abstract interfaces for credential fetching (`ProvideCredential`) and validity (`SigningCredential`)
//! - **CredentialCache**: Hands out a valid credential, fetching through a provider with single-flight semantics
//!
//! ## Example
//!
//! ```no_run
//! use sassign_core::{Context, CredentialCache, ProvideCredential, Result, SigningCredential};
//! use async_trait::async_trait;
//!
//! // Define your credential type
//! #[derive(Clone, Debug)]
//! struct MyToken {
//!     token: String,
//! }
//!
//! impl SigningCredential for MyToken {
//!     fn is_valid(&self) -> bool {
//!         !self.token.is_empty()
//!     }
//! }
//!
//! // Implement credential provider
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyToken;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyToken {
//!             token: "my-token".to_string(),
//!         }))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let cache = CredentialCache::new(Context::new(), MyProvider);
//!
//! // The first call fetches, the following ones reuse the cached token.
//! let token = cache.get(false).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Base64 and HMAC helpers
//! - [`time`]: Timestamp formatting shared by every signed field
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SigningCredential};
mod cache;
pub use cache::CredentialCache;
