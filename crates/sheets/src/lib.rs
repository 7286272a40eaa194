//! Spreadsheet access for sheetdex.
//!
//! Everything that knows what a sheet *is*: the row and catalog models, the
//! column schema shared with the provider, the [`SheetFetcher`] trait that
//! reads one tab, and the helpers that render a cell as a followable link.

mod address;
pub mod error;
pub mod fetcher;
mod models;

pub use crate::address::{CellAddress, column_letter, content_offset};
#[cfg(feature = "http")]
pub use crate::fetcher::HttpFetcher;
#[cfg(any(test, feature = "mock"))]
pub use crate::fetcher::MockFetcher;
pub use crate::fetcher::{SheetFetcher, TimeoutFetcher};
pub use crate::models::{Catalog, Columns, Dataset, DatasetColumns, DatasetRef, LinkColumns, Record};
use std::sync::Arc;

pub type FetcherHandle = Arc<dyn SheetFetcher + Send + Sync>;
