//! JSON-file backed session storage

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::auth::session::{MemorySessionStore, Session, SessionStore};
use crate::error::{Error, Result};

/// Session store that keeps sessions in memory and writes a snapshot to disk
/// after every change, so logins survive a restart.
pub struct FileSessionStore {
    inner: MemorySessionStore,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Open the store, loading any unexpired sessions already on disk
    pub async fn open(path: &Path, max_age: u64) -> Result<Self> {
        let sessions: HashMap<String, Session> = match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        let sessions: HashMap<String, Session> = sessions
            .into_iter()
            .filter(|(_, session)| !session.is_expired())
            .collect();

        tracing::info!(
            "Loaded {} session(s) from {}",
            sessions.len(),
            path.display()
        );

        Ok(Self {
            inner: MemorySessionStore::from_sessions(sessions, max_age),
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    async fn persist(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let snapshot = self.inner.snapshot().await;
        let bytes = serde_json::to_vec(&snapshot)?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| Error::Session(format!("writing {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| Error::Session(format!("replacing {}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    fn create(&self) -> Session {
        self.inner.create()
    }

    async fn load(&self, id: &str) -> Result<Session> {
        self.inner.load(id).await
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.inner.save(session).await?;
        self.persist().await
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let removed = self.inner.cleanup_expired().await?;
        if removed > 0 {
            self.persist().await?;
        }
        Ok(removed)
    }
}
