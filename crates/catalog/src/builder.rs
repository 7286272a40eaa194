//! Catalog construction: link sheet, then every dataset sheet at once.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use futures::future::try_join_all;
use sheetdex_sheets::{Catalog, Dataset, DatasetRef, FetcherHandle, LinkColumns};
use tracing::instrument;

/// The link sheet is always read from its first tab.
pub const LINK_TAB: &str = "1";

/// Builds a complete [`Catalog`] from a link sheet.
///
/// Building never touches the cache. It either produces a whole catalog or
/// fails; there is no partially built catalog.
#[derive(Clone)]
pub struct CatalogBuilder {
    fetcher: FetcherHandle,
    columns: LinkColumns,
}

impl CatalogBuilder {
    pub fn new(fetcher: FetcherHandle) -> Self {
        Self {
            fetcher,
            columns: LinkColumns::default(),
        }
    }

    /// Override the link sheet column names.
    pub fn with_columns(mut self, columns: LinkColumns) -> Self {
        self.columns = columns;
        self
    }

    /// Fetch the link sheet, then fetch every dataset it lists concurrently.
    ///
    /// 1. The link sheet is fetched from [`LINK_TAB`]. If that fails, or any
    ///    of its rows doesn't describe a dataset, the build fails with
    ///    [`ErrorKind::LinkSheet`].
    /// 2. One fetch per dataset is dispatched before any of them is awaited.
    /// 3. The first dataset fetch to fail fails the build with
    ///    [`ErrorKind::Dataset`]; the fetches still in flight are dropped.
    /// 4. Otherwise datasets are assembled in link sheet order, whatever
    ///    order the fetches completed in.
    #[instrument(skip(self), fields(fetcher = self.fetcher.name()))]
    pub async fn build(&self, link_sheet_id: &str) -> Result<Catalog> {
        let rows = self.fetcher.fetch(link_sheet_id, LINK_TAB).await.or_raise(|| ErrorKind::LinkSheet)?;
        let described = rows
            .iter()
            .map(|row| DatasetRef::from_record(row, &self.columns))
            .collect::<sheetdex_sheets::error::Result<Vec<_>>>()
            .or_raise(|| ErrorKind::LinkSheet)?;
        tracing::debug!(datasets = described.len(), "Link sheet resolved");
        // `try_join_all` polls every future on its first poll (fan-out) and
        // yields results in input order (fan-in).
        let datasets = try_join_all(described.into_iter().map(|dataset| self.fetch_dataset(dataset))).await?;
        tracing::info!(datasets = datasets.len(), "Catalog built");
        Ok(Catalog::from(datasets))
    }

    async fn fetch_dataset(&self, dataset: DatasetRef) -> Result<Dataset> {
        let rows = self
            .fetcher
            .fetch(&dataset.sheet_id, &dataset.tab_id)
            .await
            .or_raise(|| ErrorKind::Dataset(dataset.name.clone()))?;
        tracing::debug!(
            name = %dataset.name,
            sheet_id = %dataset.sheet_id,
            tab_id = %dataset.tab_id,
            index = ?dataset.index,
            rows = rows.len(),
            "Dataset fetched"
        );
        Ok(dataset.resolve(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetdex_sheets::{MockFetcher, Record, TimeoutFetcher};
    use std::sync::Arc;
    use std::time::Duration;

    fn link(sheets: &[(&str, &str, &str)]) -> Vec<Record> {
        sheets
            .iter()
            .enumerate()
            .map(|(i, (name, sheet_id, tab_id))| {
                let index = (i + 1).to_string();
                [
                    ("namapraktikum", name.to_string()),
                    ("sheetid", sheet_id.to_string()),
                    ("gid", tab_id.to_string()),
                    ("sheetindex", index),
                ]
                .into_iter()
                .collect()
            })
            .collect()
    }

    fn row(npm: &str) -> Record {
        [("npm", npm), ("nama", "Someone"), ("content", "intro,modA,modB")].into_iter().collect()
    }

    fn abc() -> MockFetcher {
        MockFetcher::default()
            .with_sheet("link", LINK_TAB, link(&[("A", "sheet-a", "10"), ("B", "sheet-b", "20"), ("C", "sheet-c", "30")]))
            .with_sheet("sheet-a", "10", vec![row("111")])
            .with_sheet("sheet-b", "20", vec![row("222"), row("333")])
            .with_sheet("sheet-c", "30", vec![])
    }

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.datasets().iter().map(|d| d.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_build() {
        let fetcher = Arc::new(abc());
        let catalog = CatalogBuilder::new(fetcher.clone()).build("link").await.unwrap();
        assert_eq!(names(&catalog), vec!["A", "B", "C"]);
        let b = &catalog.datasets()[1];
        assert_eq!((b.sheet_id.as_str(), b.tab_id.as_str(), b.index), ("sheet-b", "20", Some(2)));
        assert_eq!(b.rows, vec![row("222"), row("333")]);
        assert!(catalog.datasets()[2].rows.is_empty());
        assert_eq!(fetcher.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_follows_link_sheet_not_completion() {
        let fetcher = Arc::new(
            abc()
                .with_delay("sheet-a", "10", Duration::from_millis(20))
                .with_delay("sheet-b", "20", Duration::from_millis(30))
                .with_delay("sheet-c", "30", Duration::from_millis(10)),
        );
        let catalog = CatalogBuilder::new(fetcher.clone()).build("link").await.unwrap();
        let completed: Vec<_> = fetcher.completed().await.into_iter().map(|(sheet, _)| sheet).collect();
        assert_eq!(completed, vec!["link", "sheet-c", "sheet-a", "sheet-b"]);
        assert_eq!(names(&catalog), vec!["A", "B", "C"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dataset_fetches_are_concurrent() {
        let delay = Duration::from_millis(100);
        let fetcher = Arc::new(
            abc()
                .with_delay("sheet-a", "10", delay)
                .with_delay("sheet-b", "20", delay)
                .with_delay("sheet-c", "30", delay),
        );
        let started = tokio::time::Instant::now();
        CatalogBuilder::new(fetcher).build("link").await.unwrap();
        // Sequential fetching would take three delays.
        assert!(started.elapsed() < delay * 2);
    }

    #[tokio::test]
    async fn test_empty_link_sheet() {
        let fetcher = Arc::new(MockFetcher::default().with_sheet("link", LINK_TAB, vec![]));
        let catalog = CatalogBuilder::new(fetcher).build("link").await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_link_sheet_unreachable() {
        let fetcher = Arc::new(abc().with_failure("link", LINK_TAB));
        let err = CatalogBuilder::new(fetcher.clone()).build("link").await.unwrap_err();
        assert_eq!(*err, ErrorKind::LinkSheet);
        // No dataset was fetched.
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_link_sheet_malformed() {
        let mut rows = link(&[("A", "sheet-a", "10")]);
        rows.push([("namapraktikum", "No Sheet Id"), ("gid", "0")].into_iter().collect());
        let fetcher = Arc::new(MockFetcher::default().with_sheet("link", LINK_TAB, rows));
        let err = CatalogBuilder::new(fetcher.clone()).build("link").await.unwrap_err();
        assert_eq!(*err, ErrorKind::LinkSheet);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_any_dataset_failure_fails_build() {
        let fetcher = Arc::new(abc().with_failure("sheet-b", "20"));
        let err = CatalogBuilder::new(fetcher).build("link").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Dataset("B".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dataset_timeout_fails_build() {
        let slow = abc().with_delay("sheet-c", "30", Duration::from_secs(60));
        let fetcher = Arc::new(TimeoutFetcher::new(Arc::new(slow), Duration::from_secs(5)));
        let err = CatalogBuilder::new(fetcher).build("link").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Dataset("C".to_string()));
    }

    #[tokio::test]
    async fn test_custom_link_columns() {
        let rows = vec![[("title", "A"), ("spreadsheet", "sheet-a"), ("tab", "10")].into_iter().collect()];
        let fetcher = Arc::new(abc().with_sheet("other", LINK_TAB, rows));
        let columns = LinkColumns {
            name: "title".to_string(),
            sheet_id: "spreadsheet".to_string(),
            tab_id: "tab".to_string(),
            index: "position".to_string(),
        };
        let catalog = CatalogBuilder::new(fetcher).with_columns(columns).build("other").await.unwrap();
        assert_eq!(names(&catalog), vec!["A"]);
        assert_eq!(catalog.datasets()[0].index, None);
    }
}
