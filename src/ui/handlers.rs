//! Home, login and logout handlers
//!
//! The caller's identity is re-derived from the session's `loggedInAs`
//! attribute on every request. Every change to that attribute is saved
//! before the response is chosen.

use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::api::server::{AppState, SharedState};
use crate::auth::{
    authenticate, load_session, save_session, AuthState, LoginOutcome, LoginRequest,
    LOGGED_IN_AS, PUBLIC_USER,
};
use crate::config::User;
use crate::templates::{PageContext, HOME_TEMPLATE, LOGIN_TEMPLATE};

use super::error_page::{found, http_error};

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

/// HEAD / - liveness probe, never touches the session
pub async fn home_head() -> StatusCode {
    StatusCode::OK
}

/// GET / - the dashboard
pub async fn home(State(state): State<SharedState>, cookies: Cookies) -> Response {
    let settings = &state.config.session;
    let mut session = load_session(state.sessions.as_ref(), &cookies, settings).await;

    let username = match AuthState::from_session(&session) {
        AuthState::LoggedOut if state.config.login_required => return found("/login"),
        AuthState::LoggedOut => {
            session.set(LOGGED_IN_AS, PUBLIC_USER);
            if let Err(e) = save_session(state.sessions.as_ref(), &cookies, settings, &session).await {
                tracing::warn!("Error saving public session: {}", e);
            }
            PUBLIC_USER.to_string()
        }
        AuthState::LoggedInPublic => PUBLIC_USER.to_string(),
        AuthState::LoggedInAs(username) => username,
    };

    render_page(&state, HOME_TEMPLATE, &username, "")
}

/// GET /login - the login form
pub async fn login_page(
    State(state): State<SharedState>,
    cookies: Cookies,
    Query(query): Query<LoginQuery>,
) -> Response {
    let session = load_session(state.sessions.as_ref(), &cookies, &state.config.session).await;
    let auth = AuthState::from_session(&session);

    if auth.is_user() {
        return found("/");
    }

    render_page(
        &state,
        LOGIN_TEMPLATE,
        auth.username().unwrap_or_default(),
        query.error.as_deref().unwrap_or_default(),
    )
}

/// POST /login - check credentials and start a user session
///
/// A body that isn't a readable form counts as empty fields.
pub async fn login_submit(
    State(state): State<SharedState>,
    cookies: Cookies,
    form: Result<Form<LoginRequest>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::debug!("Unreadable login form: {}", e);
            LoginRequest::default()
        }
    };
    let outcome = authenticate(&state.config, &form.username, &form.password).await;
    if outcome != LoginOutcome::Success {
        let code = outcome.error_code().unwrap_or_default();
        return found(&format!("/login?error={}", code));
    }

    let settings = &state.config.session;
    let mut session = load_session(state.sessions.as_ref(), &cookies, settings).await;
    session.set(LOGGED_IN_AS, &form.username);

    if let Err(e) = save_session(state.sessions.as_ref(), &cookies, settings, &session).await {
        tracing::warn!("Error saving session: {}", e);
        return http_error(&state, StatusCode::INTERNAL_SERVER_ERROR, "Error saving session");
    }

    tracing::info!("User '{}' logged in", form.username);
    found("/")
}

/// /logout - forget the identity and return to the login form
pub async fn logout(State(state): State<SharedState>, cookies: Cookies) -> Response {
    let settings = &state.config.session;
    let mut session = load_session(state.sessions.as_ref(), &cookies, settings).await;
    session.remove(LOGGED_IN_AS);

    if let Err(e) = save_session(state.sessions.as_ref(), &cookies, settings, &session).await {
        tracing::warn!("Error saving session: {}", e);
        return http_error(&state, StatusCode::INTERNAL_SERVER_ERROR, "Error saving session");
    }

    found("/login")
}

/// Render a page for `username`; unknown names get an empty user
fn render_page(state: &AppState, template: &str, username: &str, error: &str) -> Response {
    let fallback = User::default();
    let ctx = PageContext {
        username,
        config: &state.config,
        user: state.config.get_user(username).unwrap_or(&fallback),
        error,
    };

    match state.templates.render(template, &ctx) {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::warn!("Error executing {} template: {}", template, e);
            http_error(
                state,
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Error executing {} template", template),
            )
        }
    }
}
