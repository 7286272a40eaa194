//! Time-bounded fetcher.
//!
//! Wraps another fetcher and fails any fetch that takes longer than a fixed
//! limit. A timed-out fetch is indistinguishable from any other failed fetch
//! to the caller, apart from its [`ErrorKind`].

use crate::error::{ErrorKind, Result};
use crate::models::Record;
use crate::{FetcherHandle, SheetFetcher};
use async_trait::async_trait;
use std::time::Duration;

/// Fetcher that bounds every call to `inner` by `limit`.
#[derive(Clone)]
pub struct TimeoutFetcher {
    inner: FetcherHandle,
    limit: Duration,
}
impl TimeoutFetcher {
    pub fn new(inner: FetcherHandle, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl SheetFetcher for TimeoutFetcher {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, sheet_id: &str, tab_id: &str) -> Result<Vec<Record>> {
        match tokio::time::timeout(self.limit, self.inner.fetch(sheet_id, tab_id)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                tracing::warn!(sheet_id, tab_id, limit = ?self.limit, "Sheet fetch timed out");
                exn::bail!(ErrorKind::Timeout)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockFetcher;
    use std::sync::Arc;

    fn mock() -> MockFetcher {
        MockFetcher::default()
            .with_sheet("fast", "0", vec![[("npm", "111")].into_iter().collect()])
            .with_sheet("slow", "0", vec![])
            .with_delay("slow", "0", Duration::from_secs(10))
    }

    #[tokio::test(start_paused = true)]
    async fn test_within_limit() {
        let fetcher = TimeoutFetcher::new(Arc::new(mock()), Duration::from_secs(5));
        let rows = fetcher.fetch("fast", "0").await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exceeds_limit() {
        let fetcher = TimeoutFetcher::new(Arc::new(mock()), Duration::from_secs(5));
        let err = fetcher.fetch("slow", "0").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inner_errors_pass_through() {
        let fetcher = TimeoutFetcher::new(Arc::new(mock()), Duration::from_secs(5));
        let err = fetcher.fetch("missing", "0").await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound("missing".to_string(), "0".to_string()));
        assert_eq!(fetcher.name(), "mock");
    }
}
