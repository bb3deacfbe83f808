//! Error types for batch disbursement
//!
//! This module defines every error a session can produce. Messages are written
//! for the operator: they name the failure kind and the values involved.
//!
//! # Error Categories
//!
//! - **Parse-time**: malformed rows, bad addresses, bad amounts. Parsing stops.
//! - **Batch-time**: empty batch, cancellation, funds, fee ceiling, failed
//!   transfers. Execution stops, the session log is still written.
//! - **Startup**: the node is unreachable. The process exits.
//! - **Persistence**: the session log could not be written.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures reported by a network client
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// Transport or JSON-RPC failure
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The client cannot move this asset type
    #[error("Unsupported asset type '{0}'")]
    UnsupportedAsset(String),

    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    /// The node refused the signed transaction
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// The transaction was mined but reverted
    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    /// The transaction disappeared from the mempool without a receipt
    #[error("Transaction {tx_hash} dropped before confirmation")]
    Dropped { tx_hash: String },

    #[error("No confirmation for {tx_hash} after {seconds}s")]
    Timeout { tx_hash: String, seconds: u64 },

    /// Unit conversion failed (e.g. too many decimal places for wei)
    #[error("Conversion error: {0}")]
    Conversion(String),
}

/// Main error type for a disbursement session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DisburseError {
    /// List file not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {message}")]
    IoError { message: String },

    /// A retained row did not have exactly four fields
    #[error("Malformed record at line {line}: expected 4 fields, found {fields}")]
    MalformedRecord { line: u64, fields: usize },

    #[error("Malformed record at line {line}: name is empty")]
    MissingName { line: u64 },

    #[error("Invalid address '{address}' at line {line}")]
    InvalidAddress { line: u64, address: String },

    /// Amount is not a decimal number or is not strictly positive
    #[error("Invalid amount '{amount}' at line {line}")]
    InvalidAmount { line: u64, amount: String },

    /// The pre-flight balance query failed; nothing was submitted
    #[error("Failed to query {asset} balance: {cause}")]
    BalanceQueryFailed { asset: String, cause: NetworkError },

    #[error("Batch is empty: nothing to transfer")]
    EmptyBatch,

    /// Sum of the amounts for one asset type does not fit a `Decimal`
    #[error("Total {asset} amount overflows")]
    TotalOverflow { asset: String },

    /// Amount is finer than the smallest unit the network can move
    #[error("Amount {amount} to {address} has more than {decimals} decimal places")]
    AmountTooPrecise {
        address: String,
        amount: Decimal,
        decimals: u32,
    },

    #[error("Batch transfer terminated by operator")]
    UserCancelled,

    #[error("Insufficient {asset} balance {balance}; less than required {required}")]
    InsufficientFunds {
        asset: String,
        balance: Decimal,
        required: Decimal,
    },

    /// Projected fee of one transfer is above the configured ceiling
    ///
    /// Fatal for the whole batch, not just the current transfer.
    #[error("Fee {cost} is higher than ceiling {ceiling}; raise fee_ceiling or wait for a quieter network")]
    FeeCeilingExceeded { cost: Decimal, ceiling: Decimal },

    #[error("Transfer to {address} failed: {cause}")]
    TransferFailed { address: String, cause: NetworkError },

    #[error("Unable to connect to node: {cause}")]
    ConnectivityError { cause: NetworkError },

    /// The session log could not be written
    ///
    /// The in-memory ledger is kept; see `SessionLedger::flush`.
    #[error("Failed to persist session log {path}: {message}")]
    PersistenceError { path: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// The operator prompt could not be read (e.g. stdin closed)
    #[error("Prompt error: {message}")]
    PromptError { message: String },
}

impl From<std::io::Error> for DisburseError {
    fn from(error: std::io::Error) -> Self {
        DisburseError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<config::ConfigError> for DisburseError {
    fn from(error: config::ConfigError) -> Self {
        DisburseError::ConfigError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl DisburseError {
    pub fn insufficient_funds(asset: &str, balance: Decimal, required: Decimal) -> Self {
        DisburseError::InsufficientFunds {
            asset: asset.to_string(),
            balance,
            required,
        }
    }

    pub fn fee_ceiling_exceeded(cost: Decimal, ceiling: Decimal) -> Self {
        DisburseError::FeeCeilingExceeded { cost, ceiling }
    }

    pub fn transfer_failed(address: &str, cause: NetworkError) -> Self {
        DisburseError::TransferFailed {
            address: address.to_string(),
            cause,
        }
    }

    pub fn invalid_address(line: u64, address: &str) -> Self {
        DisburseError::InvalidAddress {
            line,
            address: address.to_string(),
        }
    }

    pub fn invalid_amount(line: u64, amount: &str) -> Self {
        DisburseError::InvalidAmount {
            line,
            amount: amount.to_string(),
        }
    }

    pub fn persistence(path: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        DisburseError::PersistenceError {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        DisburseError::ConfigError {
            message: message.into(),
        }
    }

    /// Whether this error aborts a batch (as opposed to parsing or startup)
    pub fn is_batch_error(&self) -> bool {
        matches!(
            self,
            DisburseError::EmptyBatch
                | DisburseError::TotalOverflow { .. }
                | DisburseError::AmountTooPrecise { .. }
                | DisburseError::UserCancelled
                | DisburseError::InsufficientFunds { .. }
                | DisburseError::BalanceQueryFailed { .. }
                | DisburseError::FeeCeilingExceeded { .. }
                | DisburseError::TransferFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::file_not_found(
        DisburseError::FileNotFound { path: "list.tsv".to_string() },
        "File not found: list.tsv"
    )]
    #[case::malformed_record(
        DisburseError::MalformedRecord { line: 3, fields: 5 },
        "Malformed record at line 3: expected 4 fields, found 5"
    )]
    #[case::invalid_address(
        DisburseError::invalid_address(2, "0xdef"),
        "Invalid address '0xdef' at line 2"
    )]
    #[case::invalid_amount(
        DisburseError::invalid_amount(4, "abc"),
        "Invalid amount 'abc' at line 4"
    )]
    #[case::insufficient_funds(
        DisburseError::insufficient_funds("ETH", Decimal::from(10), Decimal::from(12)),
        "Insufficient ETH balance 10; less than required 12"
    )]
    #[case::fee_ceiling(
        DisburseError::fee_ceiling_exceeded(Decimal::new(42, 4), Decimal::new(1, 3)),
        "Fee 0.0042 is higher than ceiling 0.001; raise fee_ceiling or wait for a quieter network"
    )]
    #[case::transfer_failed(
        DisburseError::transfer_failed("0xabc", NetworkError::Rejected("nonce too low".to_string())),
        "Transfer to 0xabc failed: Transaction rejected: nonce too low"
    )]
    #[case::total_overflow(
        DisburseError::TotalOverflow { asset: "ETH".to_string() },
        "Total ETH amount overflows"
    )]
    #[case::amount_too_precise(
        DisburseError::AmountTooPrecise {
            address: "0xabc".to_string(),
            amount: Decimal::new(1, 19),
            decimals: 18,
        },
        "Amount 0.0000000000000000001 to 0xabc has more than 18 decimal places"
    )]
    #[case::connectivity(
        DisburseError::ConnectivityError { cause: NetworkError::Rpc("connection refused".to_string()) },
        "Unable to connect to node: RPC error: connection refused"
    )]
    fn test_error_display(#[case] error: DisburseError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case(DisburseError::EmptyBatch, true)]
    #[case(DisburseError::UserCancelled, true)]
    #[case(DisburseError::TotalOverflow { asset: "ETH".to_string() }, true)]
    #[case(DisburseError::fee_ceiling_exceeded(Decimal::ONE, Decimal::ZERO), true)]
    #[case(DisburseError::MalformedRecord { line: 1, fields: 3 }, false)]
    #[case(DisburseError::persistence("out/log", "disk full"), false)]
    fn test_batch_error_classification(#[case] error: DisburseError, #[case] expected: bool) {
        assert_eq!(error.is_batch_error(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: DisburseError = io_error.into();
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
