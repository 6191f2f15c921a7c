//! Status and proxy route handlers

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::server::SharedState;
use crate::gateway::{self, StatusReport};
use crate::ui::http_error;

/// GET /status/{b64url} - report whether a URL answers
pub async fn status(
    State(state): State<SharedState>,
    Path(b64url): Path<String>,
) -> Json<StatusReport> {
    let url = gateway::decode_target(&b64url);
    Json(gateway::check_status(&state.http, &url).await)
}

/// ANY /proxy/{b64url} - relay to an allow-listed URL
///
/// Only the upstream body is streamed back; upstream status and headers are
/// dropped.
pub async fn proxy(
    State(state): State<SharedState>,
    Path(b64url): Path<String>,
    method: Method,
    body: Bytes,
) -> Response {
    let url = gateway::decode_target(&b64url);

    if !gateway::is_proxy_allowed(&state.config.allow_proxy, &url) {
        tracing::warn!(url = %url, "URL is disallowed for proxy");
        return http_error(
            &state,
            StatusCode::BAD_REQUEST,
            "This URL is not in the proxy allow-list",
        );
    }

    match gateway::relay(&state.http, method, &url, body).await {
        Ok(upstream) => Body::from_stream(upstream.bytes_stream()).into_response(),
        Err(e) => {
            tracing::warn!("Error proxying {}: {}", url, e);
            http_error(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Proxying connection failed",
            )
        }
    }
}
