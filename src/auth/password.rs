//! Credential checks against configured bcrypt hashes

use crate::auth::models::LoginOutcome;
use crate::config::Config;
use crate::error::Result;

/// Hash a password for use as a `PasswordHash` config value
pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Check a username/password pair against the configured users
///
/// Unknown users and wrong passwords are reported separately. A malformed
/// hash in the config counts as a wrong password.
pub async fn authenticate(config: &Config, username: &str, password: &str) -> LoginOutcome {
    let Some(user) = config.get_user(username) else {
        return LoginOutcome::UnknownUser;
    };

    let hash = user.password_hash.clone();
    let password = password.to_string();
    // bcrypt is deliberately slow; keep it off the async workers
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await;

    match verified {
        Ok(Ok(true)) => LoginOutcome::Success,
        Ok(Ok(false)) => LoginOutcome::WrongPassword,
        Ok(Err(e)) => {
            tracing::debug!("Password hash for '{}' is unusable: {}", username, e);
            LoginOutcome::WrongPassword
        }
        Err(e) => {
            tracing::warn!("Password verification task failed: {}", e);
            LoginOutcome::WrongPassword
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::User;

    fn config_with(username: &str, password: &str) -> Config {
        let mut config = Config::default();
        config.users.insert(
            username.to_string(),
            User {
                password_hash: bcrypt::hash(password, 4).unwrap(),
                ..User::default()
            },
        );
        config
    }

    #[tokio::test]
    async fn test_correct_password() {
        let config = config_with("alice", "hunter2");
        assert_eq!(
            authenticate(&config, "alice", "hunter2").await,
            LoginOutcome::Success
        );
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let config = config_with("alice", "hunter2");
        assert_eq!(
            authenticate(&config, "alice", "hunter3").await,
            LoginOutcome::WrongPassword
        );
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let config = config_with("alice", "hunter2");
        assert_eq!(
            authenticate(&config, "Alice", "hunter2").await,
            LoginOutcome::UnknownUser
        );
    }

    #[tokio::test]
    async fn test_malformed_hash() {
        let mut config = Config::default();
        config.users.insert("bob".to_string(), User::default());
        assert_eq!(
            authenticate(&config, "bob", "").await,
            LoginOutcome::WrongPassword
        );
    }

    #[test]
    fn test_hash_password_verifies() {
        let hash = hash_password("s3cret").unwrap();
        assert!(bcrypt::verify("s3cret", &hash).unwrap());
    }
}
