//! Cell addressing.
//!
//! Turns positions found in a [`Dataset`](crate::Dataset) into something a
//! human can click on.

use derive_more::Display;

/// Convert a 1-based column index into a spreadsheet column letter.
///
/// Bijective base-26: `1 → "A"`, `26 → "Z"`, `27 → "AA"`. There is no column
/// zero, so `0` returns `None`.
///
/// ```
/// use sheetdex_sheets::column_letter;
/// assert_eq!(column_letter(3).as_deref(), Some("C"));
/// assert_eq!(column_letter(28).as_deref(), Some("AB"));
/// assert_eq!(column_letter(0), None);
/// ```
pub fn column_letter(index: usize) -> Option<String> {
    if index == 0 {
        return None;
    }
    let mut letters = Vec::new();
    let mut remaining = index;
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        // Infallible: `rem` is always below 26.
        letters.push(char::from(b'A' + rem as u8));
        remaining = (remaining - 1) / 26;
    }
    Some(letters.into_iter().rev().collect())
}

/// Find `label` in a content cell and return its zero-based position.
///
/// The content cell lists sub-columns separated by commas. Each part is
/// either a bare label (`"modA"`) or a `label: value` pair; only the label
/// is compared, exactly and case-sensitively.
pub fn content_offset(content: &str, label: &str) -> Option<usize> {
    content.split(',').position(|part| {
        let name = part.split_once(':').map_or(part, |(name, _)| name);
        name.trim() == label
    })
}

/// The location of a single cell, rendered as a viewable URL.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("https://docs.google.com/spreadsheets/d/{sheet_id}/edit#gid={tab_id}&range={column}{row}")]
pub struct CellAddress {
    pub sheet_id: String,
    pub tab_id: String,
    /// Column letter(s), e.g. `"C"`.
    pub column: String,
    /// 1-based row number, as shown by the spreadsheet.
    pub row: usize,
}

impl CellAddress {
    pub fn new(sheet_id: impl Into<String>, tab_id: impl Into<String>, column: impl Into<String>, row: usize) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            tab_id: tab_id.into(),
            column: column.into(),
            row,
        }
    }

    /// Spreadsheet-style cell reference, e.g. `"C2"`.
    pub fn cell(&self) -> String {
        format!("{}{}", self.column, self.row)
    }
}
