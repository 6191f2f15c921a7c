//! Outbound HTTP on behalf of the browser: reachability checks and a
//! same-origin proxy for allow-listed URLs.
//!
//! Targets arrive base64 encoded (standard alphabet) in the request path.

pub mod relay;
pub mod status;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::time::Duration;

use crate::error::Result;

pub use relay::relay;
pub use status::{check_status, StatusReport};

/// Upper bound for any single outbound request
pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the shared outbound client
pub fn build_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(OUTBOUND_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Encode a URL the way `/status/` and `/proxy/` expect it
pub fn encode_target(url: &str) -> String {
    STANDARD.encode(url.as_bytes())
}

/// Decode a base64 path segment into a target URL
///
/// Lenient: malformed base64 yields an empty string and invalid UTF-8 is
/// replaced, so the caller always gets something to try (and fail) with.
pub fn decode_target(encoded: &str) -> String {
    match STANDARD.decode(encoded.as_bytes()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::debug!("Ignoring malformed base64 target {:?}: {}", encoded, e);
            String::new()
        }
    }
}

/// Whether a URL may be proxied
///
/// A URL is allowed when any allow-list entry occurs anywhere in it. This is
/// substring containment, not host or prefix matching.
pub fn is_proxy_allowed(allow_list: &[String], url: &str) -> bool {
    allow_list.iter().any(|token| url.contains(token.as_str()))
}
