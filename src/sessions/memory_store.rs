use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::ExplorerSession;
use crate::sessions::{SessionHandle, SessionStore};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct SessionEntry {
    session: SessionHandle,
    last_access: Instant,
}

/// Process-local session store. Sessions end with the process or after
/// `idle_timeout` without a request.
#[derive(Clone)]
pub struct InMemorySessionStore {
    inner: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    idle_timeout: Duration,
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    fn expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.duration_since(entry.last_access) > self.idle_timeout
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, SessionEntry>) -> u64 {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| !self.expired(entry, now));
        (before - sessions.len()) as u64
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: ExplorerSession) -> AppResult<Uuid> {
        let session_id = Uuid::new_v4();
        let mut inner = self.inner.lock().await;
        self.sweep(&mut inner);
        inner.insert(
            session_id,
            SessionEntry {
                session: Arc::new(Mutex::new(session)),
                last_access: Instant::now(),
            },
        );
        Ok(session_id)
    }

    async fn get(&self, session_id: Uuid) -> AppResult<Option<SessionHandle>> {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        let expired = match inner.get(&session_id) {
            Some(entry) => self.expired(entry, now),
            None => return Ok(None),
        };
        if expired {
            inner.remove(&session_id);
            return Ok(None);
        }

        Ok(inner.get_mut(&session_id).map(|entry| {
            entry.last_access = now;
            entry.session.clone()
        }))
    }

    async fn delete(&self, session_id: Uuid) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        inner
            .remove(&session_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Session".to_string()))
    }

    async fn count(&self) -> AppResult<u64> {
        let inner = self.inner.lock().await;
        Ok(inner.len() as u64)
    }

    async fn purge_idle(&self) -> AppResult<u64> {
        let mut inner = self.inner.lock().await;
        Ok(self.sweep(&mut inner))
    }
}
