//! Configuration schema definitions
//!
//! Keys are read with the dashboard's historical spelling (`Title`,
//! `LoginRequired`, `[[Users.alice.card]]`, ...) and serialized in snake case
//! so templates can refer to `config.title`, `user.cards`, and so on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct Config {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub theme: String,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub login_required: bool,

    /// Substring tokens; a proxy target containing any of them is allowed
    #[serde(default)]
    pub allow_proxy: Vec<String>,

    #[serde(default)]
    pub users: BTreeMap<String, User>,
}

/// Session cookie and storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct SessionConfig {
    /// Cookie name carrying the session id
    #[serde(default = "default_session_name")]
    pub name: String,

    /// Session lifetime in seconds
    #[serde(default = "default_max_age")]
    pub max_age: u64,

    /// Persist sessions to this JSON file instead of keeping them in memory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_session_name() -> String {
    "simpledash_session".to_string()
}

fn default_max_age() -> u64 {
    30 * 24 * 60 * 60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: default_session_name(),
            max_age: default_max_age(),
            path: None,
        }
    }
}

/// A configured dashboard user
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct User {
    /// bcrypt digest of the user's password
    #[serde(default, skip_serializing)]
    pub password_hash: String,

    /// Whether these cards are shown to the public identity
    #[serde(default)]
    pub show_public: bool,

    #[serde(default, rename(deserialize = "card"))]
    pub cards: Vec<Card>,
}

/// A widget on the home page
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Card {
    /// Name of the card template that renders this card
    #[serde(rename = "type")]
    pub card_type: String,

    pub title: String,

    #[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Opaque payload interpreted only by the matching card template
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, DataValue>,
}

/// Value stored in a card's `data` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DataValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<DataValue>),
    Map(BTreeMap<String, DataValue>),
}

impl Config {
    /// Get a user by name
    pub fn get_user(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
Title = "Home"
Theme = "dark"
LoginRequired = true
AllowProxy = ["api.weather.gov"]

[Session]
Name = "dash"

[Users.alice]
PasswordHash = "$2b$10$abc"
ShowPublic = true

[[Users.alice.card]]
type = "link"
title = "Git"
url = "https://git.example.com"

[[Users.alice.card]]
type = "weather"
title = "Weather"
desc = "Local forecast"

[Users.alice.card.data]
lat = 40.5
zone = "NYZ072"
units = { temp = "F", imperial = true }
"#;

    #[test]
    fn test_parse_sample() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.title, "Home");
        assert!(config.login_required);
        assert_eq!(config.allow_proxy, vec!["api.weather.gov"]);
        assert_eq!(config.session.name, "dash");
        assert_eq!(config.session.max_age, default_max_age());

        let alice = config.get_user("alice").unwrap();
        assert!(alice.show_public);
        assert_eq!(alice.cards.len(), 2);
        assert_eq!(alice.cards[0].card_type, "link");
        assert_eq!(alice.cards[1].description.as_deref(), Some("Local forecast"));
        assert_eq!(alice.cards[1].data["lat"], DataValue::Float(40.5));
        assert_eq!(
            alice.cards[1].data["zone"],
            DataValue::String("NYZ072".to_string())
        );
        match &alice.cards[1].data["units"] {
            DataValue::Map(units) => assert_eq!(units["imperial"], DataValue::Boolean(true)),
            other => panic!("expected nested map, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("Title = \"x\"").unwrap();
        assert_eq!(config.session.name, "simpledash_session");
        assert!(!config.login_required);
        assert!(config.users.is_empty());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("$2b$10$abc"));
        assert!(json.contains("\"type\":\"link\""));
    }
}
