//! JSON file cache store.
//!
//! Survives process restarts. The entry is written to a temporary sibling
//! first and then renamed over the real file, so a reader sees either the old
//! entry or the new one, never half of each. Every write gets its own
//! temporary file, so overlapping writes never share one; the last rename wins.

use crate::CacheStore;
use crate::entry::{CacheEntry, EntryRef, EntryRow};
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::instrument;

static NEXT_TEMP: AtomicU64 = AtomicU64::new(0);

/// Cache store backed by a single JSON file.
///
/// `produced_at` is persisted with millisecond precision.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A sibling of the cache file unique to this process and write.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        let seq = NEXT_TEMP.fetch_add(1, Ordering::Relaxed);
        name.push(format!(".{}.{seq}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CacheStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn read(&self) -> Result<Option<CacheEntry>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).or_raise(|| ErrorKind::Io(self.path.clone())),
        };
        let row: EntryRow = serde_json::from_slice(&bytes).or_raise(|| ErrorKind::InvalidData("catalog"))?;
        CacheEntry::try_from(row).map(Some)
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn write(&self, entry: CacheEntry) -> Result<()> {
        let bytes = serde_json::to_vec(&EntryRef::try_from(&entry)?).or_raise(|| ErrorKind::InvalidData("catalog"))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Io(parent.to_path_buf()))?;
        }
        let temp = self.temp_path();
        let written = match tokio::fs::write(&temp, &bytes).await {
            Ok(()) => tokio::fs::rename(&temp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            // Nothing else knows this temp file's name.
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e).or_raise(|| ErrorKind::Io(self.path.clone()));
        }
        tracing::debug!(bytes = bytes.len(), datasets = entry.catalog.len(), "Wrote catalog cache");
        Ok(())
    }
}
