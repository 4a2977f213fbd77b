use crate::{Context, Error, ProvideCredential, Result, SigningCredential};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::sync::Mutex;

/// CredentialCache hands out a valid credential, fetching one through its
/// provider only when the cached value is missing, invalid or force renewed.
///
/// The cached value sits behind an async mutex that is held across the fetch,
/// so concurrent callers never start more than one fetch at a time: whoever
/// waits behind an in-flight fetch observes its result instead of fetching
/// again. Refresh is purely reactive; there is no background timer.
pub struct CredentialCache<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    cached: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Clone for CredentialCache<K> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            provider: self.provider.clone(),
            cached: self.cached.clone(),
        }
    }
}

impl<K: SigningCredential> Debug for CredentialCache<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("ctx", &self.ctx)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl<K: SigningCredential> CredentialCache<K> {
    /// Create a new cache that fetches credentials from `provider`.
    pub fn new(ctx: Context, provider: impl ProvideCredential<Credential = K>) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            cached: Arc::new(Mutex::new(None)),
        }
    }

    /// Get a valid credential.
    ///
    /// - Without `force_renew`, a cached credential that is still valid is
    ///   returned without calling the provider.
    /// - Otherwise the provider is called and its result replaces the cached
    ///   value wholesale.
    ///
    /// A failed fetch leaves the cached value untouched, unless the fetch was
    /// forced: a forced renewal means the caller already knows the cached
    /// credential was rejected, so it is evicted.
    pub async fn get(&self, force_renew: bool) -> Result<K> {
        let mut cached = self.cached.lock().await;

        if !force_renew {
            if let Some(cred) = cached.as_ref().filter(|v| v.is_valid()) {
                debug!("credential cache hit");
                return Ok(cred.clone());
            }
        }

        debug!("fetching credential, force_renew: {force_renew}");
        let fetched = self
            .provider
            .provide_credential(&self.ctx)
            .await
            .and_then(|v| {
                v.ok_or_else(|| {
                    Error::config_invalid("no credential provided, check provider configuration")
                })
            });

        match fetched {
            Ok(cred) => {
                *cached = Some(cred.clone());
                Ok(cred)
            }
            Err(err) => {
                if force_renew {
                    *cached = None;
                }
                Err(err)
            }
        }
    }

    /// Peek at the cached credential without fetching.
    pub async fn cached(&self) -> Option<K> {
        self.cached.lock().await.clone()
    }
}
