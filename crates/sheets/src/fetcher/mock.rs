//! In-memory sheet fetcher for testing.

use crate::SheetFetcher;
use crate::error::{ErrorKind, Result};
use crate::models::Record;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

type SheetKey = (String, String);

fn key(sheet_id: &str, tab_id: &str) -> SheetKey {
    (sheet_id.to_string(), tab_id.to_string())
}

#[derive(Default)]
struct State {
    sheets: HashMap<SheetKey, Vec<Record>>,
    failing: HashSet<SheetKey>,
    delays: HashMap<SheetKey, Duration>,
    completed: Vec<SheetKey>,
}

/// In-memory sheet fetcher for testing.
///
/// Sheets live in a `HashMap` behind a [`RwLock`], so behaviour can be
/// changed between calls on `&self`. Failures and per-sheet delays can be
/// injected, and every call is counted.
///
/// # Examples
///
/// ```
/// use sheetdex_sheets::{MockFetcher, SheetFetcher};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = MockFetcher::default()
///     .with_sheet("link", "1", vec![[("sheetid", "abc")].into_iter().collect()]);
/// assert_eq!(fetcher.fetch("link", "1").await?.len(), 1);
/// assert_eq!(fetcher.calls(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockFetcher {
    name: String,
    state: RwLock<State>,
    calls: AtomicUsize,
}

impl MockFetcher {
    /// Change the name of the mock fetcher.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sheet(mut self, sheet_id: &str, tab_id: &str, rows: Vec<Record>) -> Self {
        self.state.get_mut().sheets.insert(key(sheet_id, tab_id), rows);
        self
    }

    /// Every fetch of this sheet fails with [`ErrorKind::Injected`].
    pub fn with_failure(mut self, sheet_id: &str, tab_id: &str) -> Self {
        self.state.get_mut().failing.insert(key(sheet_id, tab_id));
        self
    }

    /// Every fetch of this sheet sleeps for `delay` before answering.
    pub fn with_delay(mut self, sheet_id: &str, tab_id: &str, delay: Duration) -> Self {
        self.state.get_mut().delays.insert(key(sheet_id, tab_id), delay);
        self
    }

    /// Replace the rows of a sheet after construction.
    pub async fn set_sheet(&self, sheet_id: &str, tab_id: &str, rows: Vec<Record>) {
        self.state.write().await.sheets.insert(key(sheet_id, tab_id), rows);
    }

    /// Toggle injected failure for a sheet after construction.
    pub async fn set_failing(&self, sheet_id: &str, tab_id: &str, failing: bool) {
        let mut state = self.state.write().await;
        match failing {
            true => state.failing.insert(key(sheet_id, tab_id)),
            false => state.failing.remove(&key(sheet_id, tab_id)),
        };
    }

    /// Total number of fetches started, successful or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(sheet_id, tab_id)` of every successful fetch, in completion order.
    pub async fn completed(&self) -> Vec<(String, String)> {
        self.state.read().await.completed.clone()
    }
}
impl Default for MockFetcher {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            state: RwLock::new(State::default()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SheetFetcher for MockFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, sheet_id: &str, tab_id: &str) -> Result<Vec<Record>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = key(sheet_id, tab_id);
        // Copy the delay out so the lock isn't held across the sleep.
        let delay = self.state.read().await.delays.get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.write().await;
        if state.failing.contains(&key) {
            exn::bail!(ErrorKind::Injected);
        }
        let rows = state
            .sheets
            .get(&key)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(key.0.clone(), key.1.clone())))?;
        state.completed.push(key);
        Ok(rows)
    }
}
