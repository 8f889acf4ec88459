//! File selection filters.

use regex::Regex;

/// Selects records from a decoded archive.
///
/// One tagged variant per selection mode, consumed by a single dispatch in
/// [`Archive::select`](crate::Archive::select): all records, a single exact
/// name, or every name matching a pattern.
#[derive(Debug, Clone)]
pub enum FileFilter {
    /// Every record, in archive order.
    All,
    /// The record whose name matches exactly, if any.
    Name(String),
    /// All records whose name matches the pattern, in archive order.
    Pattern(Regex),
}

impl FileFilter {
    /// Whether a record name passes this filter.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Name(wanted) => name == wanted,
            Self::Pattern(re) => re.is_match(name),
        }
    }
}
