//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

pub const CONFIG_FILENAME: &str = "simpledash.toml";

/// Upper bound for `Session.MaxAge`, in seconds (100 years)
pub const MAX_SESSION_AGE: u64 = 100 * 365 * 24 * 60 * 60;

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content =
        fs::read_to_string(path).map_err(|_| Error::ConfigNotFound(path.to_path_buf()))?;
    parse_config(&content)
}

/// Parse configuration text, expanding environment variables first
pub fn parse_config(content: &str) -> Result<Config> {
    let content = interpolate_env_vars(content);
    let config: Config = toml::from_str(&content)?;
    if config.session.name.is_empty() {
        return Err(Error::Config("Session.Name must not be empty".to_string()));
    }
    if config.session.max_age > MAX_SESSION_AGE {
        return Err(Error::Config(format!(
            "Session.MaxAge must be at most {} seconds",
            MAX_SESSION_AGE
        )));
    }
    Ok(config)
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("valid env interpolation pattern");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# simpledash configuration

Title = "Simpledash"
Theme = "dark"
LoginRequired = false

# A URL may be fetched through /proxy/ when it contains any of these strings
AllowProxy = ["api.weather.gov"]

[Session]
Name = "simpledash_session"
# MaxAge = 2592000
# Path = "sessions.json"

# Generate hashes with `simpledash hash-password <password>`
[Users.admin]
PasswordHash = "${SIMPLEDASH_ADMIN_HASH:-}"
ShowPublic = true

[[Users.admin.card]]
type = "link"
title = "Rust"
desc = "The Rust programming language"
url = "https://www.rust-lang.org"

[[Users.admin.card]]
type = "status"
title = "Example"
url = "https://example.com"

[[Users.admin.card]]
type = "embed"
title = "Forecast"
url = "https://api.weather.gov/gridpoints/OKX/33,35/forecast"

[Users.admin.card.data]
height = 240
"#
}
