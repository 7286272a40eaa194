//! Catalog repository for a spreadsheet-backed student registry.
//!
//! A *link sheet* lists dataset sheets (one per lab or course). The
//! [`CatalogBuilder`] reads the link sheet, fetches every dataset sheet it
//! names concurrently, and assembles them into a [`Catalog`](sheetdex_sheets::Catalog).
//! The [`Repository`] puts a cache in front of that: catalogs younger than
//! [`TTL`] are served from the cache store, older ones are rebuilt.

mod builder;
mod clock;
pub mod error;
mod repo;
mod search;

pub use crate::builder::{CatalogBuilder, LINK_TAB};
#[cfg(any(test, feature = "mock"))]
pub use crate::clock::ManualClock;
pub use crate::clock::{Clock, ClockHandle, SystemClock};
pub use crate::repo::{Repository, TTL};
pub use crate::search::{SearchHit, search};
