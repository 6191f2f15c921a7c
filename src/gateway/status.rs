//! Reachability checks

use serde::{Deserialize, Serialize};

/// JSON body returned by `/status/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Upstream status code, 0 when no response was received
    pub code: u16,
    pub down: bool,
}

impl StatusReport {
    pub fn up(code: u16) -> Self {
        Self { code, down: false }
    }

    pub fn down() -> Self {
        Self { code: 0, down: true }
    }
}

/// Send a single HEAD request to `url`
///
/// Any answer counts as up, whatever its status. A URL that cannot be turned
/// into a request, or a request that fails or times out, counts as down.
pub async fn check_status(client: &reqwest::Client, url: &str) -> StatusReport {
    let request = match client.head(url).build() {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Error creating HEAD request for status check: {}", e);
            return StatusReport::down();
        }
    };

    match client.execute(request).await {
        Ok(response) => StatusReport::up(response.status().as_u16()),
        Err(e) => {
            tracing::warn!("Error executing HEAD request for status check: {}", e);
            StatusReport::down()
        }
    }
}
