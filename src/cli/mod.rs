//! CLI interface for simpledash

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simpledash")]
#[command(version)]
#[command(about = "A simple, configurable personal dashboard", long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, global = true, default_value = "simpledash.toml", env = "SIMPLEDASH_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the dashboard HTTP server
    Serve {
        /// Bind address for HTTP server
        #[arg(short, long, default_value = "0.0.0.0")]
        addr: String,

        /// Bind port for HTTP server
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Directory holding templates/ and public/
        #[arg(short, long, default_value = "resources")]
        resources: PathBuf,
    },

    /// Write a sample config file
    Init,

    /// Print a bcrypt hash for a user's PasswordHash
    HashPassword {
        /// Password to hash
        password: String,
    },

    /// Validate the config file and templates without serving
    Check {
        /// Directory holding templates/ and public/
        #[arg(short, long, default_value = "resources")]
        resources: PathBuf,
    },
}
