//! Data handed to page templates

use serde::Serialize;

use crate::config::{Config, User};

/// Context for the home and login pages
#[derive(Debug, Serialize)]
pub struct PageContext<'a> {
    /// Identity from the session, `_public_` for the public identity
    pub username: &'a str,
    pub config: &'a Config,
    /// The identity's user entry; empty when the name is not configured
    pub user: &'a User,
    /// Login error code from the query string (`usr` or `pwd`)
    pub error: &'a str,
}

/// Context for the error page
#[derive(Debug, Serialize)]
pub struct ErrorContext<'a> {
    pub status_code: u16,
    pub reason: &'a str,
    pub config: &'a Config,
}
