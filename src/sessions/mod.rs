pub mod memory_store;

pub use memory_store::InMemorySessionStore;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ExplorerSession;

/// Shared handle to one stored session. Lock it to read or change the
/// session; changes made under the lock are what the store holds.
pub type SessionHandle = Arc<Mutex<ExplorerSession>>;

/// Session store trait for abstracting where explorer sessions live
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session and return its id
    async fn create(&self, session: ExplorerSession) -> AppResult<Uuid>;

    /// Get a session by id and mark it as used
    async fn get(&self, session_id: Uuid) -> AppResult<Option<SessionHandle>>;

    /// Delete a session
    async fn delete(&self, session_id: Uuid) -> AppResult<()>;

    /// Number of live sessions
    async fn count(&self) -> AppResult<u64>;

    /// Drop sessions idle past the store's timeout; returns how many went
    async fn purge_idle(&self) -> AppResult<u64>;
}
