//! Sheet fetcher trait and implementations.
//!
//! A [`SheetFetcher`] turns a (sheet id, tab id) pair into rows. The catalog
//! builder uses the same fetcher for the link sheet and for every dataset
//! sheet it references.

#[cfg(feature = "http")]
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod timeout;

#[cfg(feature = "http")]
pub use self::http::HttpFetcher;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockFetcher;
pub use self::timeout::TimeoutFetcher;
use crate::error::Result;
use crate::models::Record;
use async_trait::async_trait;

/// Published list feed, addressed by sheet id and tab.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://spreadsheets.google.com/feeds/list/{sheet_id}/{tab_id}/public/values?alt=json";

/// Unified interface for reading a single sheet tab.
///
/// Implementations must be safe to call concurrently: the catalog builder
/// dispatches every dataset fetch before awaiting any of them.
///
/// # Examples
///
/// ```
/// use sheetdex_sheets::{SheetFetcher, error::Result};
///
/// async fn count_rows(fetcher: &dyn SheetFetcher, sheet_id: &str) -> Result<usize> {
///     let rows = fetcher.fetch(sheet_id, "0").await?;
///     Ok(rows.len())
/// }
/// ```
#[async_trait]
pub trait SheetFetcher: Send + Sync {
    /// Name of the fetcher (used for logging only).
    fn name(&self) -> &str;

    /// Fetch every row of one tab, in sheet order (header row excluded).
    ///
    /// An existing but empty tab is `Ok(vec![])`, not an error.
    async fn fetch(&self, sheet_id: &str, tab_id: &str) -> Result<Vec<Record>>;
}
