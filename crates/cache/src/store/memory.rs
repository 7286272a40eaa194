//! In-process cache store.

use crate::CacheStore;
use crate::entry::CacheEntry;
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-wide single slot behind a [`RwLock`].
///
/// Reads are cheap: the catalog is behind an [`Arc`](std::sync::Arc), so a
/// read clones a pointer, not the datasets.
#[derive(Default)]
pub struct MemoryStore {
    slot: RwLock<Option<CacheEntry>>,
}

impl MemoryStore {
    /// Create a store that already holds `entry`.
    pub fn with_entry(entry: CacheEntry) -> Self {
        Self {
            slot: RwLock::new(Some(entry)),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self) -> Result<Option<CacheEntry>> {
        Ok(self.slot.read().await.clone())
    }

    async fn write(&self, entry: CacheEntry) -> Result<()> {
        *self.slot.write().await = Some(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetdex_sheets::{Catalog, Dataset};
    use std::sync::Arc;
    use time::UtcDateTime;

    fn catalog(name: &str) -> Catalog {
        Catalog::from(vec![Dataset {
            name: name.to_string(),
            sheet_id: "abc".to_string(),
            tab_id: "0".to_string(),
            index: None,
            rows: vec![],
        }])
    }

    #[tokio::test]
    async fn test_empty() {
        let store = MemoryStore::default();
        assert!(store.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = MemoryStore::default();
        let entry = CacheEntry::new(catalog("A"), UtcDateTime::now());
        store.write(entry.clone()).await.unwrap();
        assert_eq!(store.read().await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let first = CacheEntry::new(catalog("A"), UtcDateTime::now());
        let store = MemoryStore::with_entry(first);
        let second = CacheEntry::new(catalog("B"), UtcDateTime::now());
        store.write(second.clone()).await.unwrap();
        let read = store.read().await.unwrap().unwrap();
        assert_eq!(read, second);
        assert!(Arc::ptr_eq(&read.catalog, &second.catalog));
    }
}
