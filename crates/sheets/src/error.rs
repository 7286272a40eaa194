//! Sheet Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Fetchers raise these; the catalog builder wraps them in
//! its own error tree to say *which* sheet failed.

use derive_more::{Display, Error};

/// A sheet error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for sheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Sheet (or tab) does not exist.
    #[display("sheet not found: ({_0}, {_1})")]
    NotFound(#[error(not(source))] String, #[error(not(source))] String),
    /// Transport-level failure talking to the spreadsheet provider.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The provider answered, but not with a success status.
    #[display("unexpected HTTP status: {_0}")]
    Status(#[error(not(source))] u16),
    /// The fetch did not complete within the configured limit.
    #[display("fetch timed out")]
    Timeout,
    /// Response body could not be understood as a sheet.
    #[display("invalid sheet data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
    /// A row is missing a column the caller relies on.
    #[display("missing column: {_0}")]
    MissingColumn(#[error(not(source))] String),
    /// Failure injected by a test fetcher.
    #[display("injected failure")]
    Injected,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout) || matches!(self, Self::Status(code) if *code >= 500)
    }
}
