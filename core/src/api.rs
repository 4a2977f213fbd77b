use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait implemented by credentials held in a
/// [`CredentialCache`](crate::CredentialCache).
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential can still be handed out.
    ///
    /// Returning `false` makes the cache fetch a fresh credential on the next call.
    fn is_valid(&self) -> bool;
}

/// ProvideCredential is the trait used by the cache to fetch a credential.
///
/// Service may require different credentials, for example Azure AD issues
/// bearer tokens through the client credentials flow.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Fetch a credential from the current env.
    ///
    /// Returns `Ok(None)` when the provider is not configured.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}
