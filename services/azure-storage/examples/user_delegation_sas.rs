use anyhow::Result;
use chrono::{Duration, Utc};
use sassign_azure_storage::{
    Config, DelegationKeyClient, SasPermission, SasSigner, SigningRequest,
};
use sassign_core::{Context, OsEnv};
use sassign_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    // AZURE_TENANT_ID, AZURE_CLIENT_ID, AZURE_CLIENT_SECRET and
    // AZURE_STORAGE_ACCOUNT_NAME are read from env.
    let config = Config::new().from_env(&ctx);
    let Some(account_name) = config.account_name.clone() else {
        println!("AZURE_STORAGE_ACCOUNT_NAME is not set, nothing to sign");
        return Ok(());
    };

    let mut args = std::env::args().skip(1);
    let container = args.next().unwrap_or_else(|| "test".to_string());
    let blob = args.next().unwrap_or_default();

    let client = DelegationKeyClient::from_config(ctx, config)?;
    let key = client
        .request_delegation_key_until(Utc::now() + Duration::hours(1))
        .await?;
    println!("Got user delegation key, valid until {}", key.signed_expiry);

    let req = SigningRequest::new(account_name, container)
        .with_blob_name(blob)
        .with_permission(SasPermission::Read);
    let url = SasSigner::new().sign(&key, &req)?;

    println!("{url}");
    Ok(())
}
