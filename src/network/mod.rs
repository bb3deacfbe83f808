//! Network client implementations
//!
//! - `eth` - JSON-RPC client for Ethereum-compatible nodes (ethers)
//! - `mock` - Scripted in-memory network for tests

pub mod eth;
pub mod mock;

pub use eth::EthClient;
pub use mock::MockNetwork;

use ethers::types::Address;
use std::str::FromStr;

/// Address-format predicate for Ethereum accounts
///
/// Requires the `0x` prefix followed by 40 hex digits. Addresses reach this
/// check already lowercased, so mixed-case checksums are not enforced.
pub fn is_eth_address(address: &str) -> bool {
    address.starts_with("0x") && address.len() == 42 && Address::from_str(address).is_ok()
}
