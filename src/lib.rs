//! simpledash - a personal dashboard server
//!
//! Authenticates a small set of configured users, renders a home page made
//! of widget cards, and offers URL status checks and a same-origin proxy.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod templates;
pub mod ui;

pub use config::Config;
pub use error::Error;
pub use templates::Templates;
