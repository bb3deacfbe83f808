//! Transfer record types for the disbursement pipeline
//!
//! A `TransferRecord` is one row of the operator's list file after validation.
//! It travels through the whole session: parsed, planned, executed, and finally
//! written to the session log as a snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a single transfer
///
/// Every record starts `Pending`. The executor moves it to `Submitted` while the
/// signed transaction is in flight, then to `Confirmed` or `Failed`. Records
/// that were never reached because the batch aborted stay `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Submitted,
    Confirmed,
    Failed,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Submitted => "submitted",
            TransferStatus::Confirmed => "confirmed",
            TransferStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// One requested disbursement
///
/// The serialized form is what lands in the session log, one JSON object per
/// record, so field names follow the log format (`assetType`, `txReference`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    /// Free-text label for the recipient (never empty)
    pub name: String,

    /// Recipient address, lowercased and validated at parse time
    pub address: String,

    /// Amount to send; strictly positive, exact decimal
    pub amount: Decimal,

    /// Unit label (e.g. `ETH`); echoed back, never interpreted by the core
    pub asset_type: String,

    pub status: TransferStatus,

    /// Transaction hash, present only once the transfer is confirmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_reference: Option<String>,

    /// Human-readable reason when `status` is `Failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransferRecord {
    /// Create a new pending record
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        amount: Decimal,
        asset_type: impl Into<String>,
    ) -> Self {
        TransferRecord {
            name: name.into(),
            address: address.into(),
            amount,
            asset_type: asset_type.into(),
            status: TransferStatus::Pending,
            tx_reference: None,
            error: None,
        }
    }

    pub fn mark_submitted(&mut self) {
        self.status = TransferStatus::Submitted;
    }

    /// Mark the record confirmed and attach the transaction hash
    pub fn mark_confirmed(&mut self, tx_reference: impl Into<String>) {
        self.status = TransferStatus::Confirmed;
        self.tx_reference = Some(tx_reference.into());
        self.error = None;
    }

    /// Mark the record failed
    ///
    /// A failed record never carries a transaction reference.
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = TransferStatus::Failed;
        self.tx_reference = None;
        self.error = Some(reason.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> TransferRecord {
        TransferRecord::new(
            "Alice",
            "0x22903dfbf50cb59f1c3897fa044a73524f44168d",
            Decimal::new(15, 1),
            "ETH",
        )
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = sample();
        assert_eq!(record.status, TransferStatus::Pending);
        assert_eq!(record.tx_reference, None);
        assert_eq!(record.error, None);
    }

    #[test]
    fn test_failed_record_drops_reference() {
        let mut record = sample();
        record.mark_submitted();
        record.tx_reference = Some("0xabc".to_string());
        record.mark_failed("node rejected transaction");

        assert_eq!(record.status, TransferStatus::Failed);
        assert_eq!(record.tx_reference, None);
        assert_eq!(record.error.as_deref(), Some("node rejected transaction"));
    }

    #[test]
    fn test_serialized_field_names() {
        let mut record = sample();
        record.mark_confirmed("0xfeed");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["amount"], "1.5");
        assert_eq!(value["assetType"], "ETH");
        assert_eq!(value["status"], "confirmed");
        assert_eq!(value["txReference"], "0xfeed");
        assert!(value.get("error").is_none());
    }

    #[rstest]
    #[case(TransferStatus::Pending, "pending")]
    #[case(TransferStatus::Submitted, "submitted")]
    #[case(TransferStatus::Confirmed, "confirmed")]
    #[case(TransferStatus::Failed, "failed")]
    fn test_status_display(#[case] status: TransferStatus, #[case] expected: &str) {
        assert_eq!(status.to_string(), expected);
    }
}
