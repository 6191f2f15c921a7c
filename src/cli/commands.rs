//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::api;
use crate::auth;
use crate::cli::{error, info, success, warn};
use crate::config::{self, loader};
use crate::templates::{Templates, ERROR_TEMPLATE, HOME_TEMPLATE, LOGIN_TEMPLATE};

/// Load config and templates, then serve until the process is stopped
pub async fn serve(config_path: &Path, addr: &str, port: u16, resources: &Path) -> Result<()> {
    let config = config::load_config_from_path(config_path)?;
    let state = api::build_state(config, resources).await?;

    let addr = format!("{}:{}", addr, port);
    api::run_server(Arc::new(state), &addr).await?;
    Ok(())
}

/// Write a sample config file
pub async fn init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        warn(&format!("{} already exists", config_path.display()));
        return Ok(());
    }

    fs::write(config_path, loader::default_config_content())?;

    success(&format!("Created {}", config_path.display()));
    info("Set a password with 'simpledash hash-password <password>' and run 'simpledash serve'");

    Ok(())
}

/// Print a bcrypt hash for a password
pub fn hash_password(password: &str) -> Result<()> {
    let hash = auth::hash_password(password)?;
    println!("{}", hash);
    Ok(())
}

/// Validate config and templates
pub async fn check(config_path: &Path, resources: &Path) -> Result<()> {
    let config = match config::load_config_from_path(config_path) {
        Ok(config) => config,
        Err(e) => {
            error(&format!("Config: {}", e));
            return Err(e.into());
        }
    };
    success(&format!(
        "Config OK: {} user(s), {} proxy allow-list entr{}",
        config.users.len(),
        config.allow_proxy.len(),
        if config.allow_proxy.len() == 1 { "y" } else { "ies" }
    ));

    let templates = match Templates::load(&resources.join("templates"))
        .and_then(|t| t.require(&[HOME_TEMPLATE, LOGIN_TEMPLATE, ERROR_TEMPLATE]).map(|_| t))
    {
        Ok(templates) => templates,
        Err(e) => {
            error(&format!("Templates: {}", e));
            return Err(e.into());
        }
    };
    success(&format!(
        "Templates OK: {}",
        templates.names().collect::<Vec<_>>().join(", ")
    ));

    for (username, user) in &config.users {
        for card in &user.cards {
            if !templates.contains(&card.card_type) {
                warn(&format!(
                    "Card '{}' of user '{}' has type '{}' with no template; it will render empty",
                    card.title, username, card.card_type
                ));
            }
        }
    }

    Ok(())
}
