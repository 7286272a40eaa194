//! Cache store trait and implementations.
//!
//! A [`CacheStore`] holds at most one [`CacheEntry`]. Writes are an
//! unconditional overwrite (no compare-and-swap); freshness policy belongs to
//! whoever reads the entry, not to the store.

mod file;
mod memory;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;
use crate::entry::CacheEntry;
use crate::error::Result;
use async_trait::async_trait;

/// Unified interface for the single-slot catalog cache.
///
/// # Examples
///
/// ```
/// use sheetdex_cache::{CacheEntry, CacheStore, MemoryStore};
/// use sheetdex_sheets::Catalog;
/// use time::UtcDateTime;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::default();
/// assert!(store.read().await?.is_none());
/// store.write(CacheEntry::new(Catalog::default(), UtcDateTime::now())).await?;
/// assert!(store.read().await?.is_some());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Name of the store (used for logging only).
    fn name(&self) -> &str;

    /// Read the current entry, if there is one.
    async fn read(&self) -> Result<Option<CacheEntry>>;

    /// Replace whatever is stored with `entry`.
    ///
    /// Implementations must never leave a partially written entry behind: a
    /// failed write either keeps the previous entry or fails reads loudly.
    async fn write(&self, entry: CacheEntry) -> Result<()>;
}
