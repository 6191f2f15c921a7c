//! Authentication models

use std::fmt;

use crate::auth::session::Session;

/// Session attribute naming the current identity
pub const LOGGED_IN_AS: &str = "loggedInAs";

/// Sentinel identity used when login is not required
pub const PUBLIC_USER: &str = "_public_";

/// Who the caller is, derived from the session on every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedInPublic,
    LoggedInAs(String),
}

impl AuthState {
    /// Derive the state from a session's `loggedInAs` attribute
    pub fn from_session(session: &Session) -> Self {
        match session.get(LOGGED_IN_AS) {
            None => AuthState::LoggedOut,
            Some(PUBLIC_USER) => AuthState::LoggedInPublic,
            Some(username) => AuthState::LoggedInAs(username.to_string()),
        }
    }

    /// Username as stored in the session, `_public_` for the public identity
    pub fn username(&self) -> Option<&str> {
        match self {
            AuthState::LoggedOut => None,
            AuthState::LoggedInPublic => Some(PUBLIC_USER),
            AuthState::LoggedInAs(username) => Some(username),
        }
    }

    /// Logged in as a configured (non-public) user
    pub fn is_user(&self) -> bool {
        matches!(self, AuthState::LoggedInAs(_))
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::LoggedOut => write!(f, "logged out"),
            AuthState::LoggedInPublic => write!(f, "public"),
            AuthState::LoggedInAs(username) => write!(f, "{}", username),
        }
    }
}

/// Login form fields; missing fields read as empty strings
#[derive(Debug, Default, serde::Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Result of checking submitted credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    UnknownUser,
    WrongPassword,
}

impl LoginOutcome {
    /// Value of the `error` query parameter sent back to `/login`
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            LoginOutcome::Success => None,
            LoginOutcome::UnknownUser => Some("usr"),
            LoginOutcome::WrongPassword => Some("pwd"),
        }
    }
}
