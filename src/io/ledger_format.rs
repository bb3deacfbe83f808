//! Session log serialization
//!
//! The session log is JSON Lines: one `TransferRecord` object per line, in
//! ledger order. Pure functions only; `SessionLedger::flush` does the I/O.

use crate::types::TransferRecord;
use std::io::Write;

/// Write records as JSON Lines
///
/// # Returns
///
/// * `Ok(())` if every record was written
/// * `Err(String)` describing the first serialization or write failure
pub fn write_ledger_jsonl(records: &[TransferRecord], output: &mut dyn Write) -> Result<(), String> {
    for record in records {
        serde_json::to_writer(&mut *output, record)
            .map_err(|e| format!("Failed to serialize record for {}: {}", record.address, e))?;
        output
            .write_all(b"\n")
            .map_err(|e| format!("Failed to write session log: {}", e))?;
    }

    output
        .flush()
        .map_err(|e| format!("Failed to flush session log: {}", e))
}

/// Render records as a JSON Lines string
pub fn ledger_to_string(records: &[TransferRecord]) -> Result<String, String> {
    let mut buffer = Vec::new();
    write_ledger_jsonl(records, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| format!("Session log is not UTF-8: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_writes_one_object_per_line_in_order() {
        let mut first = TransferRecord::new("A", "0xaa", Decimal::ONE, "ETH");
        first.mark_confirmed("0x01");
        let mut second = TransferRecord::new("B", "0xbb", Decimal::new(25, 1), "ETH");
        second.mark_failed("Fee 0.1 is higher than ceiling 0.01");
        let third = TransferRecord::new("C", "0xcc", Decimal::TWO, "ETH");

        let output = ledger_to_string(&[first, second, third]).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines,
            vec![
                r#"{"name":"A","address":"0xaa","amount":"1","assetType":"ETH","status":"confirmed","txReference":"0x01"}"#,
                r#"{"name":"B","address":"0xbb","amount":"2.5","assetType":"ETH","status":"failed","error":"Fee 0.1 is higher than ceiling 0.01"}"#,
                r#"{"name":"C","address":"0xcc","amount":"2","assetType":"ETH","status":"pending"}"#,
            ]
        );
    }

    #[test]
    fn test_empty_ledger_writes_nothing() {
        assert_eq!(ledger_to_string(&[]).unwrap(), "");
    }
}
