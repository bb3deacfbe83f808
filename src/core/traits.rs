//! Collaborator traits consumed by the core
//!
//! The orchestration pipeline only talks to the outside world through these
//! two traits, so tests can substitute `MockNetwork` and `ScriptedOperator`
//! for the Ethereum client and the terminal.

use crate::types::{
    Account, Credentials, DisburseError, FeeQuote, NetworkError, Receipt, SignedTransfer,
    TransferRequest,
};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Blockchain network client
///
/// Every async method is a suspension point of the session. Implementations
/// must resolve `submit` exactly once, with either a receipt for an included
/// transaction or a definitive failure.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Current block height; used as the startup connectivity check
    async fn block_height(&self) -> Result<u64, NetworkError>;

    /// Address-format predicate used by the record parser
    fn is_valid_address(&self, address: &str) -> bool;

    /// Decimal places of the smallest unit of `asset_type`, if the client knows it
    fn amount_decimals(&self, _asset_type: &str) -> Option<u32> {
        None
    }

    /// Resolve the sending account for a set of credentials
    fn open_account(&self, credentials: Credentials) -> Result<Account, NetworkError>;

    /// Balance of `address` in units of `asset_type`
    async fn balance(&self, address: &str, asset_type: &str) -> Result<Decimal, NetworkError>;

    /// Estimated resource units (gas) for a transfer
    async fn estimate_fee(&self, request: &TransferRequest) -> Result<Decimal, NetworkError>;

    /// Current price of one resource unit, in the fee ceiling's denomination
    async fn unit_price(&self) -> Result<Decimal, NetworkError>;

    /// Sign a transfer with the account's credentials
    async fn sign(
        &self,
        request: &TransferRequest,
        quote: &FeeQuote,
        account: &Account,
    ) -> Result<SignedTransfer, NetworkError>;

    /// Broadcast a signed transfer and wait for its receipt
    async fn submit(&self, signed: SignedTransfer) -> Result<Receipt, NetworkError>;
}

/// Operator interaction
#[async_trait]
pub trait Operator: Send + Sync {
    /// Ask a yes/no question; an empty answer takes `default`
    async fn confirm(&self, prompt: &str, default: bool) -> Result<bool, DisburseError>;

    /// Ask a free-form question; an empty answer takes `default`
    async fn ask_text(&self, prompt: &str, default: &str) -> Result<String, DisburseError>;
}
