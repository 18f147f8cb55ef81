use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{CachedQuote, QuoteKey};
use crate::store::KeyValueStore;

/// Last computed total per quoted slot.
///
/// Entries are overwritten on every new quote for the same slot and are
/// never expired here.
#[derive(Clone)]
pub struct QuoteCache {
    store: Arc<dyn KeyValueStore>,
}

impl QuoteCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Cached entry for `key`; an unreadable entry counts as a miss
    pub async fn get(&self, key: &QuoteKey) -> Result<Option<CachedQuote>> {
        let Some(raw) = self.store.get(&key.to_string()).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(cached) => Ok(Some(cached)),
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", key, e);
                Ok(None)
            }
        }
    }

    pub async fn put(&self, key: &QuoteKey, entry: CachedQuote) -> Result<()> {
        self.store
            .put(&key.to_string(), &serde_json::to_string(&entry)?)
            .await?;
        debug!("Cached quote {} = {}", key, entry.total);
        Ok(())
    }
}
