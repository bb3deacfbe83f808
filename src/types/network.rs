//! Values exchanged with the network client
//!
//! These types keep the core chain-agnostic: amounts and fees are plain
//! decimals, and signed payloads are opaque bytes.

use rust_decimal::Decimal;

/// A prospective transfer, before fees are attached
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub asset_type: String,
}

/// Live fee inputs for one transfer
///
/// `unit_price` is expressed in the same denomination as the fee ceiling
/// (ether per gas for the Ethereum client).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeQuote {
    /// Estimated resource units (gas)
    pub units: Decimal,
    pub unit_price: Decimal,
}

impl FeeQuote {
    /// Projected cost, or `None` if the product does not fit a `Decimal`
    pub fn projected_cost(&self) -> Option<Decimal> {
        self.units.checked_mul(self.unit_price)
    }
}

/// A signed, ready-to-broadcast transaction
#[derive(Clone, PartialEq)]
pub struct SignedTransfer {
    /// Transaction hash, known before broadcast
    pub hash: String,
    pub raw: Vec<u8>,
}

impl std::fmt::Debug for SignedTransfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedTransfer")
            .field("hash", &self.hash)
            .field("raw_len", &self.raw.len())
            .finish()
    }
}

/// Confirmation details for an included transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projected_cost_is_exact() {
        let quote = FeeQuote {
            units: Decimal::from(21_000),
            unit_price: Decimal::new(2, 8), // 20 gwei in ether
        };
        assert_eq!(quote.projected_cost(), Some(Decimal::new(42, 5)));
    }

    #[test]
    fn test_projected_cost_overflow() {
        let quote = FeeQuote {
            units: Decimal::MAX,
            unit_price: Decimal::from(2),
        };
        assert_eq!(quote.projected_cost(), None);
    }
}
