//! Transaction fee ceiling
//!
//! Every transfer is priced before it is signed. If the projected fee is above
//! the configured ceiling the whole batch stops; the operator can raise the
//! ceiling or wait for a quieter network.

use crate::types::{DisburseError, FeeQuote};
use rust_decimal::Decimal;
use tracing::warn;

/// Compares projected transfer fees against a fixed ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeGuard {
    ceiling: Decimal,
}

impl FeeGuard {
    pub fn new(ceiling: Decimal) -> Self {
        FeeGuard { ceiling }
    }

    /// Check a fee quote against the ceiling
    ///
    /// A fee exactly equal to the ceiling is accepted. A product too large for
    /// a `Decimal` is reported as `Decimal::MAX`.
    ///
    /// # Returns
    ///
    /// * `Ok(cost)` - the projected cost, within the ceiling
    /// * `Err(FeeCeilingExceeded)` - carrying the cost and the ceiling
    pub fn check(&self, quote: &FeeQuote) -> Result<Decimal, DisburseError> {
        let cost = quote.projected_cost().unwrap_or(Decimal::MAX);
        warn!(
            units = %quote.units,
            unit_price = %quote.unit_price,
            "Fee cost: {}",
            cost
        );

        if cost > self.ceiling {
            return Err(DisburseError::fee_ceiling_exceeded(cost, self.ceiling));
        }

        Ok(cost)
    }
}
