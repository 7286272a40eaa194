//! The single cached catalog and when it was produced.

use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use sheetdex_sheets::Catalog;
use std::sync::Arc;
use time::{Duration, UtcDateTime};

/// A complete catalog snapshot plus the moment it was built.
///
/// There is at most one entry per store. An entry is always a whole catalog;
/// stores never hold a partially filled one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub catalog: Arc<Catalog>,
    pub produced_at: UtcDateTime,
}

impl CacheEntry {
    pub fn new(catalog: impl Into<Arc<Catalog>>, produced_at: UtcDateTime) -> Self {
        Self {
            catalog: catalog.into(),
            produced_at,
        }
    }

    /// How old the entry is at `now`. Negative if `now` is before production
    /// (clock went backwards).
    pub fn age(&self, now: UtcDateTime) -> Duration {
        now - self.produced_at
    }
}

/// On-disk shape of a [`CacheEntry`] (serialize side).
#[derive(Serialize)]
pub(crate) struct EntryRef<'a> {
    /// Unix timestamp in milliseconds.
    pub(crate) produced_at: i64,
    pub(crate) catalog: &'a Catalog,
}
impl<'a> TryFrom<&'a CacheEntry> for EntryRef<'a> {
    type Error = Error;
    fn try_from(entry: &'a CacheEntry) -> Result<Self, Self::Error> {
        let millis = entry.produced_at.unix_timestamp_nanos() / 1_000_000;
        Ok(Self {
            produced_at: i64::try_from(millis).or_raise(|| ErrorKind::InvalidData("produced at"))?,
            catalog: entry.catalog.as_ref(),
        })
    }
}

/// On-disk shape of a [`CacheEntry`] (deserialize side).
#[derive(Deserialize)]
pub(crate) struct EntryRow {
    pub(crate) produced_at: i64,
    pub(crate) catalog: Catalog,
}
impl TryFrom<EntryRow> for CacheEntry {
    type Error = Error;
    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let nanos = i128::from(row.produced_at) * 1_000_000;
        Ok(Self {
            catalog: Arc::new(row.catalog),
            produced_at: UtcDateTime::from_unix_timestamp_nanos(nanos)
                .or_raise(|| ErrorKind::InvalidData("produced at"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetdex_sheets::{Dataset, Record};

    fn catalog() -> Catalog {
        Catalog::from(vec![Dataset {
            name: "Basis Data".to_string(),
            sheet_id: "abc".to_string(),
            tab_id: "0".to_string(),
            index: Some(1),
            rows: vec![[("npm", "111")].into_iter().collect::<Record>()],
        }])
    }

    #[test]
    fn test_age() {
        let produced_at = UtcDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let entry = CacheEntry::new(catalog(), produced_at);
        assert_eq!(entry.age(produced_at + Duration::seconds(90)), Duration::seconds(90));
        assert!(entry.age(produced_at - Duration::seconds(1)).is_negative());
    }

    #[test]
    fn test_row_keeps_millisecond_precision() {
        let produced_at = UtcDateTime::from_unix_timestamp_nanos(1_700_000_000_123_456_789).unwrap();
        let entry = CacheEntry::new(catalog(), produced_at);
        let json = serde_json::to_string(&EntryRef::try_from(&entry).unwrap()).unwrap();
        let row: EntryRow = serde_json::from_str(&json).unwrap();
        assert_eq!(row.produced_at, 1_700_000_000_123);
        let back = CacheEntry::try_from(row).unwrap();
        assert_eq!(back.produced_at, UtcDateTime::from_unix_timestamp_nanos(1_700_000_000_123_000_000).unwrap());
        assert_eq!(back.catalog, entry.catalog);
    }
}
