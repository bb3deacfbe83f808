//! Batch planning
//!
//! A `BatchPlan` is built once per session from the parsed record list. It
//! owns the sending account and the records, and carries the exact decimal
//! total for each asset type.

use crate::types::{Account, DisburseError, TransferRecord};
use rust_decimal::Decimal;

/// Records to send, their per-asset totals, and the sending account
#[derive(Debug)]
pub struct BatchPlan {
    pub account: Account,
    pub records: Vec<TransferRecord>,
    /// Total per asset type, in order of first appearance in the list
    pub totals: Vec<(String, Decimal)>,
}

/// Sum amounts per asset type, preserving first-seen order
///
/// # Errors
///
/// `TotalOverflow` naming the asset whose total does not fit a `Decimal`.
pub fn totals_by_asset(records: &[TransferRecord]) -> Result<Vec<(String, Decimal)>, DisburseError> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();

    for record in records {
        match totals
            .iter_mut()
            .find(|(asset, _)| *asset == record.asset_type)
        {
            Some((asset, total)) => {
                *total = total
                    .checked_add(record.amount)
                    .ok_or_else(|| DisburseError::TotalOverflow {
                        asset: asset.clone(),
                    })?
            }
            None => totals.push((record.asset_type.clone(), record.amount)),
        }
    }

    Ok(totals)
}

impl BatchPlan {
    /// Build the plan for a session
    ///
    /// # Errors
    ///
    /// - `EmptyBatch` if there are no records
    /// - `TotalOverflow` if a per-asset total overflows
    pub fn new(account: Account, records: Vec<TransferRecord>) -> Result<Self, DisburseError> {
        if records.is_empty() {
            return Err(DisburseError::EmptyBatch);
        }

        let totals = totals_by_asset(&records)?;

        Ok(BatchPlan {
            account,
            records,
            totals,
        })
    }

    /// One-line summary for the confirmation prompt, e.g. `1.5 ETH + 20 USDT`
    pub fn totals_summary(&self) -> String {
        self.totals
            .iter()
            .map(|(asset, total)| format!("{} {}", total.normalize(), asset))
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// Reject amounts finer than the smallest unit of their asset
    ///
    /// `decimals` gives the decimal places per asset type; assets it returns
    /// `None` for are not checked.
    pub fn ensure_precision(
        &self,
        decimals: impl Fn(&str) -> Option<u32>,
    ) -> Result<(), DisburseError> {
        for record in &self.records {
            let Some(places) = decimals(&record.asset_type) else {
                continue;
            };
            if record.amount.normalize().scale() > places {
                return Err(DisburseError::AmountTooPrecise {
                    address: record.address.clone(),
                    amount: record.amount,
                    decimals: places,
                });
            }
        }
        Ok(())
    }

    pub fn confirmation_prompt(&self) -> String {
        format!(
            "Are you sure to transfer {} to {} addresses?",
            self.totals_summary(),
            self.records.len()
        )
    }
}
