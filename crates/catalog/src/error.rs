//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. The fetcher or store error that caused a failure is kept
//! as a child frame of the error tree.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a catalog failure.
///
/// Both fetch failures abort the whole build; they are kept apart so logs and
/// callers can tell *which* sheet to look at.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The link sheet could not be fetched, or one of its rows does not
    /// describe a dataset.
    #[display("link sheet unreachable or malformed")]
    LinkSheet,
    /// A dataset sheet could not be fetched. Carries the dataset's display
    /// name (of the first failure, if several failed).
    #[display("dataset sheet unreachable or malformed: {_0}")]
    Dataset(#[error(not(source))] String),
    /// Reading or writing the [cache store](sheetdex_cache::CacheStore) failed.
    #[display("catalog cache unavailable")]
    Cache,
    /// The repository could not be assembled from configuration.
    #[display("invalid repository configuration")]
    Config,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Nothing in this crate retries; retrying is left to the caller.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::LinkSheet.to_string(), "link sheet unreachable or malformed");
        assert_eq!(
            ErrorKind::Dataset("Basis Data".to_string()).to_string(),
            "dataset sheet unreachable or malformed: Basis Data"
        );
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Cache.is_retryable());
        assert!(ErrorKind::Dataset("A".to_string()).is_retryable());
        assert!(!ErrorKind::Config.is_retryable());
    }
}
