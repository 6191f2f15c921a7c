//! Uniform error pages and redirects

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::api::server::AppState;
use crate::templates::{ErrorContext, ERROR_TEMPLATE};

/// Respond with `status` and the rendered error page
///
/// The status is fixed before rendering; if the error template itself fails
/// the failure is logged and the response carries no body.
pub fn http_error(state: &AppState, status: StatusCode, reason: &str) -> Response {
    let ctx = ErrorContext {
        status_code: status.as_u16(),
        reason,
        config: &state.config,
    };

    match state.templates.render(ERROR_TEMPLATE, &ctx) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::warn!("Error occurred while handling error: {}", e);
            status.into_response()
        }
    }
}

/// `302 Found` redirect
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
