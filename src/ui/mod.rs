//! Web UI: dashboard pages and error responses

pub mod error_page;
pub mod handlers;

pub use error_page::{found, http_error};
pub use handlers::*;
