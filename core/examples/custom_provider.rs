use async_trait::async_trait;
use sassign_core::time::{now, DateTime};
use sassign_core::{Context, CredentialCache, OsEnv, ProvideCredential, Result, SigningCredential};

// A token with a fixed lifetime.
#[derive(Clone, Debug)]
struct ApiToken {
    token: String,
    expires_at: DateTime,
}

impl SigningCredential for ApiToken {
    fn is_valid(&self) -> bool {
        !self.token.is_empty() && self.expires_at > now()
    }
}

// Loads the token from the MY_API_TOKEN env.
#[derive(Debug)]
struct EnvTokenProvider;

#[async_trait]
impl ProvideCredential for EnvTokenProvider {
    type Credential = ApiToken;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(token) = ctx.env_var("MY_API_TOKEN") else {
            return Ok(None);
        };

        Ok(Some(ApiToken {
            token,
            expires_at: now() + chrono::Duration::minutes(5),
        }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let ctx = Context::new().with_env(OsEnv);
    let cache = CredentialCache::new(ctx, EnvTokenProvider);

    match cache.get(false).await {
        Ok(token) => {
            println!("token loaded, valid until {}", token.expires_at);
            // Served from the cache this time.
            let again = cache.get(false).await?;
            assert_eq!(token.token, again.token);
        }
        Err(err) => println!("no token available: {err}"),
    }

    Ok(())
}
