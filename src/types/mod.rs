//! Types module
//!
//! Contains core data structures used throughout the application:
//! - `record`: transfer records and their status
//! - `account`: the sending account and its credentials
//! - `network`: values exchanged with the network client
//! - `error`: error types for sessions and network clients

pub mod account;
pub mod error;
pub mod network;
pub mod record;

pub use account::{Account, Credentials};
pub use error::{DisburseError, NetworkError};
pub use network::{FeeQuote, Receipt, SignedTransfer, TransferRequest};
pub use record::{TransferRecord, TransferStatus};
