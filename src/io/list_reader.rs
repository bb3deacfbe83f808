//! Tab-delimited list reader with iterator interface
//!
//! Streams raw rows out of the operator's list file. Comment rows (first field
//! starting with `#`) and blank rows are skipped here, so every row yielded is
//! one the parser must validate. Conversion to `TransferRecord` lives in
//! `record_format`.
//!
//! # Example
//!
//! ```no_run
//! use batch_disburse::io::ListReader;
//! use std::path::Path;
//!
//! let reader = ListReader::open(Path::new("list.tsv")).unwrap();
//! for row in reader {
//!     let row = row.unwrap();
//!     println!("line {}: {:?}", row.line, row.fields);
//! }
//! ```

use crate::types::DisburseError;
use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A retained row of the list file, fields already trimmed
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source file
    pub line: u64,
    pub fields: Vec<String>,
}

/// Streaming reader over the rows of a list file
pub struct ListReader<R: Read> {
    records: StringRecordsIntoIter<R>,
}

impl ListReader<File> {
    /// Open a list file from disk
    ///
    /// # Errors
    ///
    /// `FileNotFound` when the path does not exist, `IoError` for any other
    /// open failure.
    pub fn open(path: &Path) -> Result<Self, DisburseError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DisburseError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => DisburseError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            },
        })?;

        Ok(Self::from_reader(file))
    }
}

impl<R: Read> ListReader<R> {
    /// Wrap any reader producing tab-delimited text
    ///
    /// The reader is configured to:
    /// - split on tabs, with no header row
    /// - trim whitespace around every field
    /// - accept rows of any width (the field count is checked by the parser)
    /// - treat quotes as ordinary characters
    pub fn from_reader(reader: R) -> Self {
        let records = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(reader)
            .into_records();

        Self { records }
    }
}

fn is_skippable(fields: &[String]) -> bool {
    match fields.first() {
        Some(first) if first.starts_with('#') => true,
        _ => fields.iter().all(|field| field.is_empty()),
    }
}

impl<R: Read> Iterator for ListReader<R> {
    type Item = Result<RawRow, DisburseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => {
                    return Some(Err(DisburseError::IoError {
                        message: format!("Failed to read list file: {}", e),
                    }))
                }
            };

            let fields: Vec<String> = record.iter().map(str::to_string).collect();
            if is_skippable(&fields) {
                continue;
            }

            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            return Some(Ok(RawRow { line, fields }));
        }
    }
}
