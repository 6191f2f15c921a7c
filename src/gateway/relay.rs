//! Proxy relay

use axum::body::Bytes;
use axum::http::Method;

use crate::error::Result;

/// Replay a request against `url` with the caller's method and body
///
/// Exactly one attempt is made. Only the upstream response is returned; the
/// caller decides what of it reaches the client.
pub async fn relay(
    client: &reqwest::Client,
    method: Method,
    url: &str,
    body: Bytes,
) -> Result<reqwest::Response> {
    let request = client.request(method, url).body(body).build()?;
    let response = client.execute(request).await?;
    Ok(response)
}
