//! Ethereum JSON-RPC client
//!
//! Moves the chain's native coin with legacy (type 0) transactions signed by a
//! local private key. Amounts and fees cross the `NetworkClient` boundary in
//! ether; conversion to and from wei happens here.

use crate::core::traits::NetworkClient;
use crate::network::is_eth_address;
use crate::types::{
    Account, Credentials, FeeQuote, NetworkError, Receipt, SignedTransfer, TransferRequest,
};
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, BlockNumber, Bytes, TransactionRequest, U256, U64};
use ethers::utils::{format_units, parse_units};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

/// Connection settings for `EthClient`
#[derive(Debug, Clone)]
pub struct EthClientConfig {
    pub rpc_url: String,
    /// Asset label that denotes the native coin (compared case-insensitively)
    pub native_asset: String,
    /// Blocks to wait for after inclusion before a receipt counts as confirmed
    pub confirmations: usize,
    pub poll_interval: Duration,
}

/// Network client backed by an ethers `Provider<Http>`
pub struct EthClient {
    provider: Provider<Http>,
    native_asset: String,
    confirmations: usize,
    chain_id: OnceCell<u64>,
}

fn rpc_error(error: impl std::fmt::Display) -> NetworkError {
    NetworkError::Rpc(error.to_string())
}

const ETHER_DECIMALS: u32 = 18;

fn to_wei(amount: Decimal) -> Result<U256, NetworkError> {
    let amount = amount.normalize();
    if amount.scale() > ETHER_DECIMALS {
        return Err(NetworkError::Conversion(format!(
            "{} ether has more than {} decimal places",
            amount, ETHER_DECIMALS
        )));
    }
    parse_units(amount.to_string(), "ether")
        .map(U256::from)
        .map_err(|e| NetworkError::Conversion(format!("{} ether: {}", amount, e)))
}

fn from_wei(wei: U256) -> Result<Decimal, NetworkError> {
    let ether = format_units(wei, "ether")
        .map_err(|e| NetworkError::Conversion(format!("{} wei: {}", wei, e)))?;
    Decimal::from_str(&ether)
        .map(|value| value.normalize())
        .map_err(|e| NetworkError::Conversion(format!("{} ether: {}", ether, e)))
}

fn units_to_decimal(units: U256) -> Result<Decimal, NetworkError> {
    Decimal::from_str(&units.to_string())
        .map_err(|e| NetworkError::Conversion(format!("{} units: {}", units, e)))
}

fn decimal_to_units(units: Decimal) -> Result<U256, NetworkError> {
    U256::from_dec_str(&units.trunc().to_string())
        .map_err(|e| NetworkError::Conversion(format!("{} units: {:?}", units, e)))
}

fn parse_address(address: &str) -> Result<Address, NetworkError> {
    if !is_eth_address(address) {
        return Err(NetworkError::InvalidAddress(address.to_string()));
    }
    Address::from_str(address).map_err(|_| NetworkError::InvalidAddress(address.to_string()))
}

fn wallet_from(credentials: &Credentials) -> Result<LocalWallet, NetworkError> {
    LocalWallet::from_str(credentials.expose().trim())
        .map_err(|e| NetworkError::Signing(format!("unusable private key: {}", e)))
}

impl EthClient {
    /// Build a client for the node at `config.rpc_url`
    ///
    /// No request is sent here; use `block_height` to check connectivity.
    pub fn connect(config: &EthClientConfig) -> Result<Self, NetworkError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| NetworkError::Rpc(format!("invalid RPC url '{}': {}", config.rpc_url, e)))?
            .interval(config.poll_interval);

        Ok(Self {
            provider,
            native_asset: config.native_asset.clone(),
            confirmations: config.confirmations.max(1),
            chain_id: OnceCell::new(),
        })
    }

    fn ensure_native(&self, asset_type: &str) -> Result<(), NetworkError> {
        if asset_type.eq_ignore_ascii_case(&self.native_asset) {
            Ok(())
        } else {
            Err(NetworkError::UnsupportedAsset(asset_type.to_string()))
        }
    }

    async fn chain_id(&self) -> Result<u64, NetworkError> {
        self.chain_id
            .get_or_try_init(|| async {
                let id = self.provider.get_chainid().await.map_err(rpc_error)?;
                debug!("Node chain id {}", id);
                Ok::<u64, NetworkError>(id.as_u64())
            })
            .await
            .copied()
    }

    fn transaction(&self, request: &TransferRequest) -> Result<TypedTransaction, NetworkError> {
        self.ensure_native(&request.asset_type)?;
        let tx = TransactionRequest::new()
            .from(parse_address(&request.from)?)
            .to(parse_address(&request.to)?)
            .value(to_wei(request.amount)?);
        Ok(tx.into())
    }
}

#[async_trait]
impl NetworkClient for EthClient {
    async fn block_height(&self) -> Result<u64, NetworkError> {
        let number = self.provider.get_block_number().await.map_err(rpc_error)?;
        Ok(number.as_u64())
    }

    fn is_valid_address(&self, address: &str) -> bool {
        is_eth_address(address)
    }

    fn amount_decimals(&self, asset_type: &str) -> Option<u32> {
        self.ensure_native(asset_type).ok().map(|_| ETHER_DECIMALS)
    }

    fn open_account(&self, credentials: Credentials) -> Result<Account, NetworkError> {
        let wallet = wallet_from(&credentials)?;
        Ok(Account::new(format!("{:?}", wallet.address()), credentials))
    }

    async fn balance(&self, address: &str, asset_type: &str) -> Result<Decimal, NetworkError> {
        self.ensure_native(asset_type)?;
        let wei = self
            .provider
            .get_balance(parse_address(address)?, None)
            .await
            .map_err(rpc_error)?;
        from_wei(wei)
    }

    async fn estimate_fee(&self, request: &TransferRequest) -> Result<Decimal, NetworkError> {
        let tx = self.transaction(request)?;
        let gas = self
            .provider
            .estimate_gas(&tx, None)
            .await
            .map_err(rpc_error)?;
        units_to_decimal(gas)
    }

    async fn unit_price(&self) -> Result<Decimal, NetworkError> {
        let wei = self.provider.get_gas_price().await.map_err(rpc_error)?;
        from_wei(wei)
    }

    async fn sign(
        &self,
        request: &TransferRequest,
        quote: &FeeQuote,
        account: &Account,
    ) -> Result<SignedTransfer, NetworkError> {
        let chain_id = self.chain_id().await?;
        let wallet = wallet_from(account.credentials())?.with_chain_id(chain_id);

        let from = parse_address(account.address())?;
        let nonce = self
            .provider
            .get_transaction_count(from, Some(BlockNumber::Pending.into()))
            .await
            .map_err(rpc_error)?;

        let mut tx = self.transaction(request)?;
        tx.set_gas(decimal_to_units(quote.units)?);
        tx.set_gas_price(to_wei(quote.unit_price)?);
        tx.set_nonce(nonce);
        tx.set_chain_id(chain_id);

        let signature = wallet
            .sign_transaction(&tx)
            .await
            .map_err(|e| NetworkError::Signing(e.to_string()))?;

        Ok(SignedTransfer {
            hash: format!("{:?}", tx.hash(&signature)),
            raw: tx.rlp_signed(&signature).to_vec(),
        })
    }

    async fn submit(&self, signed: SignedTransfer) -> Result<Receipt, NetworkError> {
        let SignedTransfer { hash, raw } = signed;

        let pending = self
            .provider
            .send_raw_transaction(Bytes::from(raw))
            .await
            .map_err(|e| NetworkError::Rejected(e.to_string()))?;
        debug!("Transaction {} broadcast, awaiting receipt", hash);

        let receipt = pending
            .confirmations(self.confirmations)
            .await
            .map_err(rpc_error)?
            .ok_or_else(|| NetworkError::Dropped {
                tx_hash: hash.clone(),
            })?;

        if receipt.status == Some(U64::zero()) {
            return Err(NetworkError::Reverted { tx_hash: hash });
        }

        Ok(Receipt {
            tx_hash: format!("{:?}", receipt.transaction_hash),
            block_number: receipt.block_number.map(|number| number.as_u64()),
            gas_used: receipt.gas_used.map(units_to_decimal).transpose()?,
        })
    }
}
