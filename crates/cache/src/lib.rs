//! Single-slot cache for a resolved catalog.
//!
//! The cache is not the source of truth - the spreadsheets are. It holds the
//! last successfully built [`Catalog`](sheetdex_sheets::Catalog) together
//! with when it was built, and nothing else. Deciding whether that entry is
//! still fresh is the repository's job, not the store's.

mod entry;
pub mod error;
mod store;

pub use crate::entry::CacheEntry;
pub use crate::store::{CacheStore, FileStore, MemoryStore};
use std::sync::Arc;

pub type StoreHandle = Arc<dyn CacheStore + Send + Sync>;
