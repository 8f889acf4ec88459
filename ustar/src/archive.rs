//! The decoded archive: an ordered record collection with filtering
//! accessors.

use crate::filter::FileFilter;
use crate::record::FileRecord;

/// An ordered sequence of decoded [`FileRecord`]s.
///
/// Record order is the order headers appear in the source buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Archive {
    files: Vec<FileRecord>,
}

impl Archive {
    pub(crate) fn new(files: Vec<FileRecord>) -> Self {
        Self { files }
    }

    /// All records, in archive order.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Number of records in the archive.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the archive holds no records.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Records passing the filter, in archive order.
    pub fn select(&self, filter: &FileFilter) -> Vec<&FileRecord> {
        self.files
            .iter()
            .filter(|file| filter.matches(file.name()))
            .collect()
    }

    /// The record with exactly this name, if present.
    pub fn find(&self, name: &str) -> Option<&FileRecord> {
        self.files.iter().find(|file| file.name() == name)
    }

    /// Consumes the archive, yielding the owned records.
    pub fn into_files(self) -> Vec<FileRecord> {
        self.files
    }
}
