//! Swappable device-local key-value storage.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// String key-value storage used for the quote cache and the session.
///
/// A bounded implementation evicts the least recently written key once full.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite `key`
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;
}

const SESSION_NAMESPACE: &str = "session";
const QUOTE_NAMESPACE: &str = "quotes";

/// The two stores the client keeps on the device.
///
/// Credentials live in an unbounded store; only the quote cache is bounded,
/// so caching quotes can never evict the session.
#[derive(Clone)]
pub struct LocalStores {
    pub session: Arc<dyn KeyValueStore>,
    pub quotes: Arc<dyn KeyValueStore>,
}

impl LocalStores {
    /// Both stores in one SQLite database, under separate namespaces
    pub async fn open_sqlite(database_url: &str, max_quotes: usize) -> Result<Self> {
        let db = SqliteStore::new(database_url).await?;
        Ok(Self {
            session: Arc::new(db.namespace(SESSION_NAMESPACE)),
            quotes: Arc::new(db.namespace(QUOTE_NAMESPACE).bounded(max_quotes)),
        })
    }

    pub fn in_memory(max_quotes: usize) -> Self {
        Self {
            session: Arc::new(MemoryStore::unbounded()),
            quotes: Arc::new(MemoryStore::new(max_quotes)),
        }
    }
}
