//! Cache-aside repository for the catalog.
//!
//! # Freshness
//! A cached catalog is served as long as it is at most [`TTL`] old. An older
//! (or missing) catalog is rebuilt through the [`CatalogBuilder`] and, only if
//! the build succeeds, written back with the current time.
//!
//! A failed build never touches the cache: the last good catalog stays in
//! the store untouched, and is served again as soon as it is considered
//! fresh (or immediately, with [`serve_stale_on_error`](Repository::serve_stale_on_error)).
//!
//! # Concurrency
//! There is no single-flight guard. Concurrent callers that all see a stale
//! or missing entry each run their own build, and the last write wins. Stores
//! replace the entry atomically, so the race only costs redundant fetches.

use crate::builder::CatalogBuilder;
use crate::clock::{ClockHandle, SystemClock};
use crate::error::{ErrorKind, Result};
use crate::search::{SearchHit, search};
use exn::ResultExt;
use sheetdex_cache::{CacheEntry, StoreHandle};
use sheetdex_sheets::{Catalog, DatasetColumns};
use std::sync::Arc;
use time::Duration;
use tracing::instrument;

/// Maximum age of a catalog that is still served from cache.
pub const TTL: Duration = Duration::seconds(3600);

/// Serves catalogs from cache, rebuilding them when they go stale.
#[derive(Clone)]
pub struct Repository {
    builder: CatalogBuilder,
    store: StoreHandle,
    clock: ClockHandle,
    columns: DatasetColumns,
    serve_stale_on_error: bool,
}

impl Repository {
    pub fn new(builder: CatalogBuilder, store: StoreHandle) -> Self {
        Self {
            builder,
            store,
            clock: Arc::new(SystemClock),
            columns: DatasetColumns::default(),
            serve_stale_on_error: false,
        }
    }

    pub fn with_clock(mut self, clock: ClockHandle) -> Self {
        self.clock = clock;
        self
    }

    /// Override the dataset column names used by [`search_record`](Self::search_record).
    pub fn with_columns(mut self, columns: DatasetColumns) -> Self {
        self.columns = columns;
        self
    }

    /// When a stale catalog can't be rebuilt, return the stale catalog
    /// instead of the build failure. A missing catalog still fails.
    ///
    /// Callers then keep getting an aging catalog for as long as builds keep
    /// failing, without ever seeing an error. Off by default.
    pub fn serve_stale_on_error(mut self, enabled: bool) -> Self {
        self.serve_stale_on_error = enabled;
        self
    }

    /// Assemble a repository from configuration: HTTP fetcher (time-bounded
    /// if a timeout is configured) plus the configured cache store.
    ///
    /// ```no_run
    /// use sheetdex_catalog::Repository;
    /// use sheetdex_config::Config;
    ///
    /// # async fn run(config: Config) -> sheetdex_catalog::error::Result<()> {
    /// let repo = Repository::from_config(&config)?;
    /// let catalog = repo.get_catalog(&config.link_sheet_id).await?;
    /// for hit in repo.search_record(&catalog, "1301210001", "modul3") {
    ///     println!("{} ({}): {}", hit.label, hit.dataset, hit.address);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "http")]
    pub fn from_config(config: &sheetdex_config::Config) -> Result<Self> {
        use sheetdex_cache::{FileStore, MemoryStore};
        use sheetdex_sheets::{FetcherHandle, HttpFetcher, TimeoutFetcher};

        config.validate().or_raise(|| ErrorKind::Config)?;
        let http = HttpFetcher::new(&config.fetch.url_template).or_raise(|| ErrorKind::Config)?;
        let fetcher: FetcherHandle = match config.fetch_timeout() {
            Some(limit) => Arc::new(TimeoutFetcher::new(Arc::new(http), limit)),
            None => Arc::new(http),
        };
        let store: StoreHandle = match config.cache_path().or_raise(|| ErrorKind::Config)? {
            Some(path) => Arc::new(FileStore::new(path)),
            None => Arc::new(MemoryStore::default()),
        };
        let builder = CatalogBuilder::new(fetcher).with_columns(config.columns.link.clone());
        Ok(Self::new(builder, store)
            .with_columns(config.columns.dataset.clone())
            .serve_stale_on_error(config.cache.serve_stale_on_error))
    }

    /// Return the catalog for `link_sheet_id`, from cache when fresh enough.
    ///
    /// An entry exactly [`TTL`] old is still fresh. Store failures surface as
    /// [`ErrorKind::Cache`]; build failures are returned as the builder
    /// reported them.
    ///
    /// The store holds a single catalog and doesn't record which link sheet
    /// it was built from. A fresh entry is served for any `link_sheet_id`, so
    /// after pointing a persistent store at a different link sheet the old
    /// catalog is served until it goes stale.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn get_catalog(&self, link_sheet_id: &str) -> Result<Arc<Catalog>> {
        let cached = self.store.read().await.or_raise(|| ErrorKind::Cache)?;
        let Some(entry) = cached else {
            tracing::info!("No cached catalog; building");
            return self.refresh(link_sheet_id).await;
        };
        let age = entry.age(self.clock.now());
        if age <= TTL {
            tracing::debug!(age_secs = age.whole_seconds(), "Serving cached catalog");
            return Ok(entry.catalog);
        }
        tracing::info!(age_secs = age.whole_seconds(), "Cached catalog is stale; rebuilding");
        match self.refresh(link_sheet_id).await {
            Err(e) if self.serve_stale_on_error && !matches!(&*e, ErrorKind::Cache) => {
                let kind: &ErrorKind = &e;
                tracing::warn!(error = %kind, age_secs = age.whole_seconds(), "Rebuild failed; serving stale catalog");
                Ok(entry.catalog)
            },
            result => result,
        }
    }

    /// Build a new catalog and, on success only, replace the cached entry.
    async fn refresh(&self, link_sheet_id: &str) -> Result<Arc<Catalog>> {
        let catalog = match self.builder.build(link_sheet_id).await {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => {
                let kind: &ErrorKind = &e;
                tracing::warn!(error = %kind, "Catalog build failed; cache left untouched");
                return Err(e);
            },
        };
        let entry = CacheEntry::new(Arc::clone(&catalog), self.clock.now());
        self.store.write(entry).await.or_raise(|| ErrorKind::Cache)?;
        Ok(catalog)
    }

    /// Locate `key` in every dataset of `catalog`; see [`search`].
    ///
    /// No I/O. A missing key or an unknown column label yields no hits rather
    /// than an error.
    pub fn search_record(&self, catalog: &Catalog, key: &str, column_label: &str) -> Vec<SearchHit> {
        search(catalog, &self.columns, key, column_label)
    }
}
