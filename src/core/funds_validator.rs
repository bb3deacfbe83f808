//! Pre-flight balance check
//!
//! Runs once per session, before the first transfer is signed. Balances are
//! not re-read during execution.

use crate::core::traits::NetworkClient;
use crate::types::{Account, DisburseError};
use rust_decimal::Decimal;
use tracing::info;

/// Confirm the account can cover every per-asset total
///
/// # Arguments
///
/// * `network` - Client used for the balance queries
/// * `account` - The sending account
/// * `totals` - Required total per asset type, in plan order
///
/// # Errors
///
/// - `InsufficientFunds` for the first asset whose required total exceeds the balance
/// - `BalanceQueryFailed` if a balance query fails (no transfer has been attempted)
pub async fn validate_funds<N>(
    network: &N,
    account: &Account,
    totals: &[(String, Decimal)],
) -> Result<(), DisburseError>
where
    N: NetworkClient + ?Sized,
{
    for (asset, required) in totals {
        let balance = network
            .balance(account.address(), asset)
            .await
            .map_err(|cause| DisburseError::BalanceQueryFailed {
                asset: asset.clone(),
                cause,
            })?;

        info!(
            outcome = "success",
            "Account {}'s {} balance is {}",
            account.address(),
            asset,
            balance
        );

        if *required > balance {
            return Err(DisburseError::insufficient_funds(asset, balance, *required));
        }
    }

    Ok(())
}
