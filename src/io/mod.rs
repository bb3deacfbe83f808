//! I/O module
//!
//! Handles list-file parsing and session log output.
//!
//! # Components
//!
//! - `list_reader` - Tab-delimited reader with iterator interface
//! - `record_format` - Row validation and conversion to `TransferRecord`
//! - `ledger_format` - JSON Lines serialization of the session log

pub mod ledger_format;
pub mod list_reader;
pub mod record_format;

pub use ledger_format::{ledger_to_string, write_ledger_jsonl};
pub use list_reader::{ListReader, RawRow};
pub use record_format::{convert_row, parse_amount, parse_records};

use crate::types::{DisburseError, TransferRecord};
use std::path::Path;
use tracing::info;

/// Open and parse a list file from disk
pub fn parse_list_file(
    path: &Path,
    is_valid_address: impl Fn(&str) -> bool,
) -> Result<Vec<TransferRecord>, DisburseError> {
    info!("Opening file from path {}", path.display());
    let reader = ListReader::open(path)?;

    info!("Parsing list file ...");
    let records = parse_records(reader, is_valid_address)?;
    info!("Parsed {} records", records.len());

    Ok(records)
}
