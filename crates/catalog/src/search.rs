//! Record lookup inside a resolved catalog.
//!
//! Pure and infallible: data that doesn't line up (no matching key, a label
//! that isn't in the content cell) simply produces no hit.

use sheetdex_sheets::{CellAddress, Catalog, Dataset, DatasetColumns, column_letter, content_offset};

/// Sheet rows are 1-based and the first row is the header.
const ROW_OFFSET: usize = 2;

/// Where a record was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// The matched record's label (e.g. the student's name).
    pub label: String,
    /// Display name of the dataset the record lives in.
    pub dataset: String,
    pub address: CellAddress,
}

/// Find `key` in every dataset of `catalog` and address its `column_label` cell.
///
/// Datasets are scanned in catalog order and independently of each other, so
/// a key present in several datasets yields one hit per dataset. Within a
/// dataset only the first row whose key column equals `key` (exactly) counts.
pub fn search(catalog: &Catalog, columns: &DatasetColumns, key: &str, column_label: &str) -> Vec<SearchHit> {
    catalog.into_iter().filter_map(|dataset| search_dataset(dataset, columns, key, column_label)).collect()
}

fn search_dataset(dataset: &Dataset, columns: &DatasetColumns, key: &str, column_label: &str) -> Option<SearchHit> {
    let (position, record) = dataset.rows.iter().enumerate().find(|(_, record)| record.get(&columns.key) == Some(key))?;
    let offset = content_offset(record.get(&columns.content)?, column_label)?;
    let column = column_letter(offset + 1)?;
    Some(SearchHit {
        label: record.get(&columns.label).unwrap_or_default().to_string(),
        dataset: dataset.name.clone(),
        address: CellAddress::new(&dataset.sheet_id, &dataset.tab_id, column, position + ROW_OFFSET),
    })
}
