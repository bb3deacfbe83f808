//! Single-transfer execution
//!
//! The executor takes one record through quote, fee check, signing,
//! submission and confirmation. It never starts a second transfer; the
//! orchestrator calls it once per record and awaits the result before moving on.

use crate::core::fee_guard::FeeGuard;
use crate::core::traits::NetworkClient;
use crate::types::{
    Account, DisburseError, FeeQuote, NetworkError, Receipt, TransferRecord, TransferRequest,
};
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of a confirmed transfer
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub receipt: Receipt,
    /// Projected fee that passed the guard
    pub projected_fee: rust_decimal::Decimal,
}

/// Signs, submits and confirms one transfer at a time
pub struct TransferExecutor<'a, N: NetworkClient + ?Sized> {
    network: &'a N,
    fee_guard: FeeGuard,
    confirmation_timeout: Option<Duration>,
}

impl<'a, N: NetworkClient + ?Sized> TransferExecutor<'a, N> {
    /// Create an executor
    ///
    /// # Arguments
    ///
    /// * `network` - Client used for quotes, signing and submission
    /// * `fee_guard` - Ceiling applied to every transfer
    /// * `confirmation_timeout` - Upper bound on the receipt wait; `None` waits indefinitely
    pub fn new(network: &'a N, fee_guard: FeeGuard, confirmation_timeout: Option<Duration>) -> Self {
        TransferExecutor {
            network,
            fee_guard,
            confirmation_timeout,
        }
    }

    async fn quote(&self, request: &TransferRequest) -> Result<FeeQuote, NetworkError> {
        let units = self.network.estimate_fee(request).await?;
        let unit_price = self.network.unit_price().await?;
        Ok(FeeQuote { units, unit_price })
    }

    async fn submit_and_wait(
        &self,
        signed: crate::types::SignedTransfer,
    ) -> Result<Receipt, NetworkError> {
        let tx_hash = signed.hash.clone();
        match self.confirmation_timeout {
            None => self.network.submit(signed).await,
            Some(limit) => tokio::time::timeout(limit, self.network.submit(signed))
                .await
                .unwrap_or_else(|_| {
                    Err(NetworkError::Timeout {
                        tx_hash,
                        seconds: limit.as_secs(),
                    })
                }),
        }
    }

    /// Execute the transfer described by `record`
    ///
    /// On success the record becomes `confirmed` with its transaction hash.
    /// On any failure the record becomes `failed` (with the reason) and carries
    /// no transaction reference.
    ///
    /// # Errors
    ///
    /// - `FeeCeilingExceeded` if the projected fee is above the ceiling; nothing is signed
    /// - `TransferFailed` for quote, signing, submission or confirmation failures
    pub async fn execute(
        &self,
        account: &Account,
        record: &mut TransferRecord,
    ) -> Result<Confirmation, DisburseError> {
        info!(
            "Sending {} {} from {} to {}",
            record.amount,
            record.asset_type,
            account.address(),
            record.address
        );

        let result = self.run(account, record).await;
        match &result {
            Ok(confirmation) => {
                record.mark_confirmed(confirmation.receipt.tx_hash.clone());
                info!(
                    outcome = "success",
                    block = ?confirmation.receipt.block_number,
                    "Send success. transactionHash: {}",
                    confirmation.receipt.tx_hash
                );
            }
            Err(e) => {
                record.mark_failed(e.to_string());
                warn!("Transfer to {} failed: {}", record.address, e);
            }
        }
        result
    }

    async fn run(
        &self,
        account: &Account,
        record: &mut TransferRecord,
    ) -> Result<Confirmation, DisburseError> {
        let request = TransferRequest {
            from: account.address().to_string(),
            to: record.address.clone(),
            amount: record.amount,
            asset_type: record.asset_type.clone(),
        };
        let failed = |cause| DisburseError::transfer_failed(&request.to, cause);

        let quote = self.quote(&request).await.map_err(failed)?;
        let projected_fee = self.fee_guard.check(&quote)?;

        let signed = self
            .network
            .sign(&request, &quote, account)
            .await
            .map_err(failed)?;

        record.mark_submitted();
        let receipt = self.submit_and_wait(signed).await.map_err(failed)?;

        Ok(Confirmation {
            receipt,
            projected_fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::MockNetwork;
    use crate::types::{Credentials, TransferStatus};
    use rust_decimal::Decimal;

    const SENDER: &str = "0x2d2970ccfd339d13a313021d5ffc6590a2412680";
    const RECIPIENT: &str = "0x22903dfbf50cb59f1c3897fa044a73524f44168d";

    fn account() -> Account {
        Account::new(SENDER, Credentials::new("key"))
    }

    fn record() -> TransferRecord {
        TransferRecord::new("Alice", RECIPIENT, Decimal::new(15, 1), "ETH")
    }

    fn guard() -> FeeGuard {
        FeeGuard::new(Decimal::new(1, 3))
    }

    #[tokio::test]
    async fn test_successful_transfer_is_confirmed() {
        let network = MockNetwork::new(SENDER);
        let executor = TransferExecutor::new(&network, guard(), None);
        let mut record = record();

        let confirmation = executor.execute(&account(), &mut record).await.unwrap();

        assert_eq!(record.status, TransferStatus::Confirmed);
        assert_eq!(record.tx_reference, Some(confirmation.receipt.tx_hash));
        assert_eq!(confirmation.projected_fee, Decimal::new(42, 5));
        assert_eq!(network.submitted(), vec![RECIPIENT.to_string()]);
    }

    #[tokio::test]
    async fn test_fee_above_ceiling_is_never_submitted() {
        let network = MockNetwork::new(SENDER).with_fee_units(RECIPIENT, Decimal::from(1_000_000));
        let executor = TransferExecutor::new(&network, guard(), None);
        let mut record = record();

        let result = executor.execute(&account(), &mut record).await;

        assert_eq!(
            result,
            Err(DisburseError::fee_ceiling_exceeded(
                Decimal::new(2, 2),
                Decimal::new(1, 3)
            ))
        );
        assert_eq!(record.status, TransferStatus::Failed);
        assert_eq!(record.tx_reference, None);
        assert!(network.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_submission_rejection_marks_failed() {
        let rejection = NetworkError::Rejected("insufficient funds for gas".to_string());
        let network = MockNetwork::new(SENDER).with_submit_failure(RECIPIENT, rejection.clone());
        let executor = TransferExecutor::new(&network, guard(), None);
        let mut record = record();

        let result = executor.execute(&account(), &mut record).await;

        assert_eq!(result, Err(DisburseError::transfer_failed(RECIPIENT, rejection)));
        assert_eq!(record.status, TransferStatus::Failed);
        assert_eq!(record.tx_reference, None);
        assert!(record.error.unwrap().contains("insufficient funds for gas"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_timeout_marks_failed() {
        let network = MockNetwork::new(SENDER).with_stalled_submit();
        let executor = TransferExecutor::new(&network, guard(), Some(Duration::from_secs(5)));
        let mut record = record();

        let result = executor.execute(&account(), &mut record).await;

        assert_eq!(
            result,
            Err(DisburseError::transfer_failed(
                RECIPIENT,
                NetworkError::Timeout {
                    tx_hash: format!("0x{:064x}", 1),
                    seconds: 5,
                }
            ))
        );
        assert_eq!(record.status, TransferStatus::Failed);
        assert_eq!(record.tx_reference, None);
        // The transaction was broadcast and may still land
        assert_eq!(network.submitted(), vec![RECIPIENT.to_string()]);
    }

    #[tokio::test]
    async fn test_signing_failure_marks_failed() {
        let network = MockNetwork::new(SENDER).with_signing_failure();
        let executor = TransferExecutor::new(&network, guard(), None);
        let mut record = record();

        let result = executor.execute(&account(), &mut record).await;

        assert!(matches!(
            result,
            Err(DisburseError::TransferFailed {
                cause: NetworkError::Signing(_),
                ..
            })
        ));
        assert_eq!(record.status, TransferStatus::Failed);
        assert!(network.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_node_fails_before_signing() {
        let network = MockNetwork::new(SENDER).unreachable();
        let executor = TransferExecutor::new(&network, guard(), None);
        let mut record = record();

        let result = executor.execute(&account(), &mut record).await;

        assert!(matches!(
            result,
            Err(DisburseError::TransferFailed {
                cause: NetworkError::Rpc(_),
                ..
            })
        ));
        assert_eq!(record.status, TransferStatus::Failed);
    }
}
