use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;

use super::KeyValueStore;

/// In-process store, lost when the process exits
pub struct MemoryStore {
    /// `None` never evicts
    capacity: Option<usize>,
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    entries: HashMap<String, String>,
    /// Write order, oldest first
    order: VecDeque<String>,
}

impl MemoryStore {
    /// Create a store holding at most `capacity` keys (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// Create a store that keeps every key until it is deleted
    pub fn unbounded() -> Self {
        Self {
            capacity: None,
            state: RwLock::new(MemoryState::default()),
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.read().await.entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.write().await;

        if state.entries.insert(key.to_string(), value.to_string()).is_some() {
            state.order.retain(|k| k != key);
        }
        state.order.push_back(key.to_string());

        let Some(capacity) = self.capacity else {
            return Ok(());
        };
        while state.entries.len() > capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            debug!("Evicting {} from memory store", oldest);
            state.entries.remove(&oldest);
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.entries.remove(key).is_some() {
            state.order.retain(|k| k != key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new(4);
        store.put("token", "abc").await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("abc"));

        store.put("token", "def").await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("def"));
        assert_eq!(store.len().await, 1);

        store.delete("token").await.unwrap();
        store.delete("token").await.unwrap();
        assert!(store.get("token").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_evicts_least_recently_written() {
        let store = MemoryStore::new(2);
        store.put("a", "1").await.unwrap();
        store.put("b", "2").await.unwrap();
        // rewriting "a" makes "b" the oldest
        store.put("a", "3").await.unwrap();
        store.put("c", "4").await.unwrap();

        assert!(store.get("b").await.unwrap().is_none());
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("c").await.unwrap().as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn test_unbounded_keeps_everything() {
        let store = MemoryStore::unbounded();
        for i in 0..1000 {
            store.put(&format!("k{i}"), "v").await.unwrap();
        }
        assert_eq!(store.len().await, 1000);
        assert_eq!(store.get("k0").await.unwrap().as_deref(), Some("v"));
    }
}
