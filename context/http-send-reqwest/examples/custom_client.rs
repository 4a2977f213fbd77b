use anyhow::Result;
use bytes::Bytes;
use reqwest::Client;
use sassign_core::Context;
use sassign_http_send_reqwest::ReqwestHttpSend;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // A tighter timeout than the default 30 seconds.
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent("sassign-example/1.0")
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    // The OpenID discovery document of the public Azure AD authority.
    let url = "https://login.microsoftonline.com/common/v2.0/.well-known/openid-configuration";
    let req = http::Request::builder()
        .method("GET")
        .uri(url)
        .body(Bytes::new())?;

    let resp = ctx.http_send_as_string(req).await?;
    println!("GET {url} -> {}", resp.status());
    println!("{}", resp.body());

    Ok(())
}
