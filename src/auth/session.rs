//! Session management
//!
//! Sessions are small string attribute maps keyed by a random id carried in a
//! cookie. Storage goes through [`SessionStore`] so the request handlers never
//! depend on a particular backend.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_cookies::cookie::time::Duration as CookieDuration;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::Result;

/// Per-visitor session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: String,
    values: BTreeMap<String, String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    #[serde(skip)]
    is_new: bool,
}

impl Session {
    /// Create a new, unsaved session living for `max_age` seconds
    pub fn new(max_age: u64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            values: BTreeMap::new(),
            created_at: now,
            expires_at: expiry_after(now, max_age),
            is_new: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True until the session has been loaded back from a store
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    fn touch(&mut self, max_age: u64) {
        self.expires_at = expiry_after(Utc::now(), max_age);
    }
}

/// `now + max_age`, saturating at the latest representable instant
fn expiry_after(now: DateTime<Utc>, max_age: u64) -> DateTime<Utc> {
    i64::try_from(max_age)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|age| now.checked_add_signed(age))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Keyed session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a fresh, unsaved session
    fn create(&self) -> Session;

    /// Load a session by id; unknown or expired ids yield a fresh session
    async fn load(&self, id: &str) -> Result<Session>;

    /// Persist a session, extending its expiry
    async fn save(&self, session: &Session) -> Result<()>;

    /// Drop expired sessions, returning how many were removed
    async fn cleanup_expired(&self) -> Result<usize>;
}

/// In-memory session storage
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    max_age: u64,
}

impl MemorySessionStore {
    /// Create a new store whose sessions live for `max_age` seconds
    pub fn new(max_age: u64) -> Self {
        Self::from_sessions(HashMap::new(), max_age)
    }

    pub(crate) fn from_sessions(sessions: HashMap<String, Session>, max_age: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(sessions)),
            max_age,
        }
    }

    pub(crate) async fn snapshot(&self) -> HashMap<String, Session> {
        self.sessions.read().await.clone()
    }

    /// Get session count
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn create(&self) -> Session {
        Session::new(self.max_age)
    }

    async fn load(&self, id: &str) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get(id) {
            if session.is_expired() {
                sessions.remove(id);
            } else {
                let mut session = session.clone();
                session.is_new = false;
                return Ok(session);
            }
        }
        Ok(self.create())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let mut stored = session.clone();
        stored.is_new = false;
        stored.touch(self.max_age);
        self.sessions
            .write()
            .await
            .insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        Ok(before - sessions.len())
    }
}

/// Load the session referenced by the request's session cookie
///
/// Store failures are logged and replaced by a fresh session so a broken
/// backend degrades to "logged out" rather than failing the request.
pub async fn load_session(
    store: &dyn SessionStore,
    cookies: &Cookies,
    settings: &SessionConfig,
) -> Session {
    let Some(cookie) = cookies.get(&settings.name) else {
        return store.create();
    };

    match store.load(cookie.value()).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Failed to load session: {}", e);
            store.create()
        }
    }
}

/// Persist a session and point the session cookie at it
///
/// The cookie is only set once the store has accepted the session, and lives
/// as long as the stored session does.
pub async fn save_session(
    store: &dyn SessionStore,
    cookies: &Cookies,
    settings: &SessionConfig,
    session: &Session,
) -> Result<()> {
    store.save(session).await?;

    let max_age = i64::try_from(settings.max_age).unwrap_or(i64::MAX);
    let mut cookie = Cookie::new(settings.name.clone(), session.id().to_string());
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(CookieDuration::seconds(max_age));
    cookies.add(cookie);
    Ok(())
}
