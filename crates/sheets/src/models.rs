//! Sheet models.
//!
//! These types represent both what a [`SheetFetcher`](crate::SheetFetcher)
//! returns (rows of cell text) and the resolved, in-memory [`Catalog`] that
//! the cache stores.

use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of a sheet: column name to cell text.
///
/// Column names follow the provider's field naming (already stripped of any
/// provider prefix by the fetcher). Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    /// Cell text for `column`, if the row has that column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// Like [`get()`](Self::get), but a missing column is an error.
    pub fn require(&self, column: &str) -> Result<&str> {
        self.get(column).ok_or_raise(|| ErrorKind::MissingColumn(column.to_string()))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Column names of the link sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkColumns {
    /// Display name of the dataset.
    pub name: String,
    pub sheet_id: String,
    pub tab_id: String,
    /// 1-based sheet index. Optional column; diagnostic only.
    pub index: String,
}
impl Default for LinkColumns {
    fn default() -> Self {
        Self {
            name: "namapraktikum".to_string(),
            sheet_id: "sheetid".to_string(),
            tab_id: "gid".to_string(),
            index: "sheetindex".to_string(),
        }
    }
}

/// Column names of every dataset sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetColumns {
    /// Column holding the lookup key (a student number).
    pub key: String,
    /// Column holding the human-readable label of a record.
    pub label: String,
    /// Column whose text lists the sub-column labels, in column order.
    pub content: String,
}
impl Default for DatasetColumns {
    fn default() -> Self {
        Self {
            key: "npm".to_string(),
            label: "nama".to_string(),
            content: "content".to_string(),
        }
    }
}

/// The agreed-upon column names for both kinds of sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub link: LinkColumns,
    pub dataset: DatasetColumns,
}

/// A dataset sheet as described by one row of the link sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub name: String,
    pub sheet_id: String,
    pub tab_id: String,
    pub index: Option<u32>,
}
impl DatasetRef {
    /// Read a dataset description out of a link sheet row.
    ///
    /// Name, sheet id and tab id are required. The index column may be
    /// absent (or blank), but if present it must be a positive integer.
    pub fn from_record(record: &Record, columns: &LinkColumns) -> Result<Self> {
        let index = match record.get(&columns.index).map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<u32>() {
                Ok(index) if index > 0 => Some(index),
                _ => exn::bail!(ErrorKind::InvalidData("sheet index")),
            },
        };
        Ok(Self {
            name: record.require(&columns.name)?.to_string(),
            sheet_id: record.require(&columns.sheet_id)?.to_string(),
            tab_id: record.require(&columns.tab_id)?.to_string(),
            index,
        })
    }

    /// Attach fetched rows, producing a resolved [`Dataset`].
    pub fn resolve(self, rows: Vec<Record>) -> Dataset {
        Dataset {
            name: self.name,
            sheet_id: self.sheet_id,
            tab_id: self.tab_id,
            index: self.index,
            rows,
        }
    }
}

/// One dataset sheet resolved into memory.
///
/// Row order is sheet order; it determines the row number reported by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub sheet_id: String,
    pub tab_id: String,
    #[serde(default)]
    pub index: Option<u32>,
    pub rows: Vec<Record>,
}

/// Every dataset referenced by the link sheet, in link sheet order.
///
/// A catalog is never mutated after it is built. Refreshing produces a whole
/// new catalog that replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(Vec<Dataset>);

impl Catalog {
    pub fn datasets(&self) -> &[Dataset] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<Vec<Dataset>> for Catalog {
    fn from(datasets: Vec<Dataset>) -> Self {
        Self(datasets)
    }
}
impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Dataset;
    type IntoIter = std::slice::Iter<'a, Dataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
