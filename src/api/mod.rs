//! HTTP server and gateway routes

pub mod routes;
pub mod server;

pub use server::*;
