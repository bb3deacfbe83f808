//! List-file record conversion
//!
//! Turns `RawRow`s into validated `TransferRecord`s. Everything here is pure:
//! the address predicate is passed in, so parsing never touches the network.

use crate::io::list_reader::{ListReader, RawRow};
use crate::types::{DisburseError, TransferRecord};
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

/// Number of columns in a list row: name, address, amount, asset type
pub const FIELD_COUNT: usize = 4;

/// Largest power of ten a `Decimal` can be scaled by
const MAX_EXPONENT: u32 = 28;

/// Parse an amount as an exact decimal
///
/// Accepts plain (`1.5`) and scientific (`1.5e3`) notation. Text that cannot
/// be represented without rounding is rejected.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    match text.split_once(|c| c == 'e' || c == 'E') {
        None => Decimal::from_str_exact(text).ok(),
        Some((mantissa, exponent)) => {
            let mantissa = Decimal::from_str_exact(mantissa).ok()?;
            let exponent = i64::from_str(exponent).ok()?;
            scale_exact(mantissa, exponent)
        }
    }
}

fn scale_exact(mut value: Decimal, exponent: i64) -> Option<Decimal> {
    let shift = u32::try_from(exponent.unsigned_abs()).ok()?;
    if shift > MAX_EXPONENT {
        return None;
    }

    if exponent >= 0 {
        (0..shift).try_fold(value, |acc, _| acc.checked_mul(Decimal::TEN))
    } else {
        let scale = value.scale() + shift;
        if scale > MAX_EXPONENT {
            return None;
        }
        value.set_scale(scale).ok()?;
        Some(value)
    }
}

/// Convert a raw row into a pending `TransferRecord`
///
/// # Errors
///
/// - `MalformedRecord` if the row does not have exactly four fields
/// - `MissingName` if the name field is empty
/// - `InvalidAddress` if the lowercased address fails `is_valid_address`
/// - `InvalidAmount` if the amount is not a decimal or is not strictly positive
pub fn convert_row(
    row: RawRow,
    is_valid_address: &dyn Fn(&str) -> bool,
) -> Result<TransferRecord, DisburseError> {
    let RawRow { line, fields } = row;

    let [name, address, amount, asset_type]: [String; FIELD_COUNT] =
        fields
            .try_into()
            .map_err(|fields: Vec<String>| DisburseError::MalformedRecord {
                line,
                fields: fields.len(),
            })?;

    if name.is_empty() {
        return Err(DisburseError::MissingName { line });
    }

    let address = address.to_lowercase();
    if !is_valid_address(&address) {
        return Err(DisburseError::invalid_address(line, &address));
    }

    let amount = match parse_amount(&amount) {
        Some(value) if value > Decimal::ZERO => value,
        _ => return Err(DisburseError::invalid_amount(line, &amount)),
    };

    Ok(TransferRecord::new(name, address, amount, asset_type))
}

/// Parse every retained row of a list into records
///
/// All-or-nothing: the first invalid row aborts and no records are returned.
pub fn parse_records<R: Read>(
    reader: ListReader<R>,
    is_valid_address: impl Fn(&str) -> bool,
) -> Result<Vec<TransferRecord>, DisburseError> {
    reader
        .map(|row| row.and_then(|row| convert_row(row, &is_valid_address)))
        .collect()
}
