//! Mock network for testing
//!
//! Balances, fee estimates and submission failures are scripted up front with
//! the builder methods; every submission is recorded so tests can assert on
//! what actually reached the "chain" and in which order.

use crate::core::traits::NetworkClient;
use crate::network::is_eth_address;
use crate::types::{
    Account, Credentials, FeeQuote, NetworkError, Receipt, SignedTransfer, TransferRequest,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

const DEFAULT_UNITS: i64 = 21_000;
/// Every mock asset is divisible like ether
const ASSET_DECIMALS: u32 = 18;

struct MockState {
    reachable: bool,
    block_height: u64,
    balances: HashMap<String, Decimal>,
    default_units: Decimal,
    units_by_recipient: HashMap<String, Decimal>,
    unit_price: Decimal,
    fail_signing: bool,
    submit_failures: HashMap<String, NetworkError>,
    stall_submit: bool,
    signed: u64,
    submitted: Vec<String>,
}

/// In-memory network client
pub struct MockNetwork {
    sender: String,
    state: Mutex<MockState>,
}

impl MockNetwork {
    /// Create a reachable network whose accounts all resolve to `sender`
    ///
    /// Defaults: 21,000 units per transfer at 20 gwei (0.00000002 per unit),
    /// no balances.
    pub fn new(sender: &str) -> Self {
        Self {
            sender: sender.to_lowercase(),
            state: Mutex::new(MockState {
                reachable: true,
                block_height: 1,
                balances: HashMap::new(),
                default_units: Decimal::from(DEFAULT_UNITS),
                units_by_recipient: HashMap::new(),
                unit_price: Decimal::new(2, 8),
                fail_signing: false,
                submit_failures: HashMap::new(),
                stall_submit: false,
                signed: 0,
                submitted: Vec::new(),
            }),
        }
    }

    fn state_mut(&mut self) -> &mut MockState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_balance(mut self, asset_type: &str, amount: Decimal) -> Self {
        self.state_mut()
            .balances
            .insert(asset_type.to_string(), amount);
        self
    }

    /// Override the estimated units for transfers to one recipient
    pub fn with_fee_units(mut self, recipient: &str, units: Decimal) -> Self {
        self.state_mut()
            .units_by_recipient
            .insert(recipient.to_lowercase(), units);
        self
    }

    pub fn with_unit_price(mut self, price: Decimal) -> Self {
        self.state_mut().unit_price = price;
        self
    }

    /// Make submission to `recipient` fail with `error`
    pub fn with_submit_failure(mut self, recipient: &str, error: NetworkError) -> Self {
        self.state_mut()
            .submit_failures
            .insert(recipient.to_lowercase(), error);
        self
    }

    /// Accept submissions but never report a receipt
    pub fn with_stalled_submit(mut self) -> Self {
        self.state_mut().stall_submit = true;
        self
    }

    pub fn with_signing_failure(mut self) -> Self {
        self.state_mut().fail_signing = true;
        self
    }

    pub fn with_block_height(mut self, height: u64) -> Self {
        self.state_mut().block_height = height;
        self
    }

    /// Make every RPC call fail
    pub fn unreachable(mut self) -> Self {
        self.state_mut().reachable = false;
        self
    }

    /// Recipients of every submitted transfer, in submission order
    pub fn submitted(&self) -> Vec<String> {
        self.lock().submitted.clone()
    }

    fn ensure_reachable(state: &MockState) -> Result<(), NetworkError> {
        if state.reachable {
            Ok(())
        } else {
            Err(NetworkError::Rpc("connection refused".to_string()))
        }
    }
}

#[async_trait]
impl NetworkClient for MockNetwork {
    async fn block_height(&self) -> Result<u64, NetworkError> {
        let state = self.lock();
        Self::ensure_reachable(&state)?;
        Ok(state.block_height)
    }

    fn is_valid_address(&self, address: &str) -> bool {
        is_eth_address(address)
    }

    fn amount_decimals(&self, _asset_type: &str) -> Option<u32> {
        Some(ASSET_DECIMALS)
    }

    fn open_account(&self, credentials: Credentials) -> Result<Account, NetworkError> {
        if credentials.is_empty() {
            return Err(NetworkError::Signing("no private key configured".to_string()));
        }
        Ok(Account::new(self.sender.clone(), credentials))
    }

    async fn balance(&self, _address: &str, asset_type: &str) -> Result<Decimal, NetworkError> {
        let state = self.lock();
        Self::ensure_reachable(&state)?;
        state
            .balances
            .get(asset_type)
            .copied()
            .ok_or_else(|| NetworkError::UnsupportedAsset(asset_type.to_string()))
    }

    async fn estimate_fee(&self, request: &TransferRequest) -> Result<Decimal, NetworkError> {
        let state = self.lock();
        Self::ensure_reachable(&state)?;
        Ok(state
            .units_by_recipient
            .get(&request.to)
            .copied()
            .unwrap_or(state.default_units))
    }

    async fn unit_price(&self) -> Result<Decimal, NetworkError> {
        let state = self.lock();
        Self::ensure_reachable(&state)?;
        Ok(state.unit_price)
    }

    async fn sign(
        &self,
        request: &TransferRequest,
        _quote: &FeeQuote,
        _account: &Account,
    ) -> Result<SignedTransfer, NetworkError> {
        let mut state = self.lock();
        if state.fail_signing {
            return Err(NetworkError::Signing("invalid private key".to_string()));
        }
        state.signed += 1;
        Ok(SignedTransfer {
            hash: format!("0x{:064x}", state.signed),
            raw: request.to.as_bytes().to_vec(),
        })
    }

    async fn submit(&self, signed: SignedTransfer) -> Result<Receipt, NetworkError> {
        // The guard must be released before a stalled submission parks
        let receipt = {
            let mut state = self.lock();
            Self::ensure_reachable(&state)?;

            let recipient = String::from_utf8_lossy(&signed.raw).into_owned();
            state.submitted.push(recipient.clone());

            if let Some(error) = state.submit_failures.get(&recipient) {
                return Err(error.clone());
            }

            if state.stall_submit {
                None
            } else {
                state.block_height += 1;
                Some(Receipt {
                    tx_hash: signed.hash,
                    block_number: Some(state.block_height),
                    gas_used: Some(state.default_units),
                })
            }
        };

        match receipt {
            Some(receipt) => Ok(receipt),
            None => std::future::pending().await,
        }
    }
}
