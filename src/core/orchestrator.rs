//! Batch orchestration
//!
//! Drives one session through its states:
//!
//! ```text
//! Idle -> Planning -> AwaitingConfirmation -> Validating -> Executing -> Flushing -> Completed
//!            |               |                    |             |
//!            +---------------+--------------------+-------------+--> Flushing -> Aborted
//! ```
//!
//! Records are executed strictly in list order, one at a time. The first
//! fee-ceiling or transfer failure stops the batch. The session ledger is
//! flushed exactly once on every path, including cancellation.

use crate::core::executor::TransferExecutor;
use crate::core::fee_guard::FeeGuard;
use crate::core::funds_validator::validate_funds;
use crate::core::plan::BatchPlan;
use crate::core::session_ledger::SessionLedger;
use crate::core::traits::{NetworkClient, Operator};
use crate::types::{Account, DisburseError, TransferRecord, TransferStatus};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Planning,
    AwaitingConfirmation,
    Validating,
    Executing,
    Flushing,
    Completed,
    Aborted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Outcome of one batch, handed back to the session runner
#[derive(Debug)]
pub struct SessionReport {
    /// `Completed` or `Aborted`
    pub state: SessionState,
    /// Why the batch aborted, if it did
    pub error: Option<DisburseError>,
    pub ledger: SessionLedger,
    /// Where the session log was written, or why it could not be
    pub flush: Result<PathBuf, DisburseError>,
}

impl SessionReport {
    /// Number of ledger entries with the given status
    pub fn count(&self, status: TransferStatus) -> usize {
        self.ledger
            .entries()
            .iter()
            .filter(|entry| entry.status == status)
            .count()
    }

    /// The first error to surface: the batch error, else the flush error
    pub fn into_result(self) -> Result<SessionReport, DisburseError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if let Err(error) = &self.flush {
            return Err(error.clone());
        }
        Ok(self)
    }
}

/// Settings shared by every batch in a process
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub fee_ceiling: rust_decimal::Decimal,
    pub confirmation_timeout: Option<Duration>,
    pub output_dir: PathBuf,
}

/// Runs one batch against a network client with operator confirmation
pub struct BatchOrchestrator<'a, N: NetworkClient + ?Sized, O: Operator + ?Sized> {
    network: &'a N,
    operator: &'a O,
    settings: BatchSettings,
    state: SessionState,
}

impl<'a, N, O> BatchOrchestrator<'a, N, O>
where
    N: NetworkClient + ?Sized,
    O: Operator + ?Sized,
{
    pub fn new(network: &'a N, operator: &'a O, settings: BatchSettings) -> Self {
        BatchOrchestrator {
            network,
            operator,
            settings,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session state {} -> {}", self.state, next);
        self.state = next;
    }

    /// Run the batch to completion
    ///
    /// Never returns early: every outcome, including failures, is described by
    /// the returned `SessionReport`.
    pub async fn run(&mut self, account: Account, records: Vec<TransferRecord>) -> SessionReport {
        let mut ledger = SessionLedger::new();
        let error = self.execute_batch(account, records, &mut ledger).await.err();

        self.transition(SessionState::Flushing);
        info!("Flushing logs ...");
        let flush = ledger.flush(&self.settings.output_dir).await;

        let state = if error.is_some() {
            SessionState::Aborted
        } else {
            SessionState::Completed
        };
        self.transition(state);

        SessionReport {
            state,
            error,
            ledger,
            flush,
        }
    }

    async fn execute_batch(
        &mut self,
        account: Account,
        records: Vec<TransferRecord>,
        ledger: &mut SessionLedger,
    ) -> Result<(), DisburseError> {
        self.transition(SessionState::Planning);
        let plan = BatchPlan::new(account, records)?;
        plan.ensure_precision(|asset| self.network.amount_decimals(asset))?;

        self.transition(SessionState::AwaitingConfirmation);
        if !self.operator.confirm(&plan.confirmation_prompt(), true).await? {
            return Err(DisburseError::UserCancelled);
        }

        let BatchPlan {
            account,
            mut records,
            totals,
        } = plan;

        self.transition(SessionState::Validating);
        validate_funds(self.network, &account, &totals).await?;

        self.transition(SessionState::Executing);
        let executor = TransferExecutor::new(
            self.network,
            FeeGuard::new(self.settings.fee_ceiling),
            self.settings.confirmation_timeout,
        );

        let mut outcome = Ok(());
        for record in records.iter_mut() {
            if outcome.is_ok() {
                outcome = executor.execute(&account, record).await.map(|_| ());
            }
            ledger.record(record);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::MockNetwork;
    use crate::operator::ScriptedOperator;
    use crate::types::Credentials;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    const SENDER: &str = "0x2d2970ccfd339d13a313021d5ffc6590a2412680";
    const ALICE: &str = "0x22903dfbf50cb59f1c3897fa044a73524f44168d";
    const CAROL: &str = "0x1111111111111111111111111111111111111111";

    fn settings(dir: &TempDir) -> BatchSettings {
        BatchSettings {
            fee_ceiling: Decimal::new(1, 3),
            confirmation_timeout: None,
            output_dir: dir.path().to_path_buf(),
        }
    }

    fn account() -> Account {
        Account::new(SENDER, Credentials::new("key"))
    }

    fn records() -> Vec<TransferRecord> {
        vec![
            TransferRecord::new("Alice", ALICE, Decimal::new(15, 1), "ETH"),
            TransferRecord::new("Carol", CAROL, Decimal::TWO, "ETH"),
        ]
    }

    #[tokio::test]
    async fn test_completed_batch() {
        let dir = TempDir::new().unwrap();
        let network = MockNetwork::new(SENDER).with_balance("ETH", Decimal::from(10));
        let operator = ScriptedOperator::new().confirm_with(true);
        let mut orchestrator = BatchOrchestrator::new(&network, &operator, settings(&dir));

        let report = orchestrator.run(account(), records()).await;

        assert_eq!(report.state, SessionState::Completed);
        assert_eq!(report.error, None);
        assert_eq!(report.count(TransferStatus::Confirmed), 2);
        assert!(report.flush.is_ok());
        assert_eq!(network.submitted(), vec![ALICE.to_string(), CAROL.to_string()]);
        assert_eq!(
            operator.prompts(),
            vec!["Are you sure to transfer 3.5 ETH to 2 addresses?".to_string()]
        );
    }

    #[tokio::test]
    async fn test_cancelled_batch_flushes_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let network = MockNetwork::new(SENDER).with_balance("ETH", Decimal::from(10));
        let operator = ScriptedOperator::new().confirm_with(false);
        let mut orchestrator = BatchOrchestrator::new(&network, &operator, settings(&dir));

        let report = orchestrator.run(account(), records()).await;

        assert_eq!(report.state, SessionState::Aborted);
        assert_eq!(report.error, Some(DisburseError::UserCancelled));
        assert!(report.ledger.is_empty());
        let path = report.flush.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
        assert!(network.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_never_prompts() {
        let dir = TempDir::new().unwrap();
        let network = MockNetwork::new(SENDER);
        let operator = ScriptedOperator::new();
        let mut orchestrator = BatchOrchestrator::new(&network, &operator, settings(&dir));

        let report = orchestrator.run(account(), vec![]).await;

        assert_eq!(report.error, Some(DisburseError::EmptyBatch));
        assert!(operator.prompts().is_empty());
        assert!(report.flush.is_ok());
        assert_eq!(orchestrator.state(), SessionState::Aborted);
    }

    #[tokio::test]
    async fn test_transfer_failure_leaves_later_records_pending() {
        let dir = TempDir::new().unwrap();
        let network = MockNetwork::new(SENDER)
            .with_balance("ETH", Decimal::from(10))
            .with_submit_failure(ALICE, crate::types::NetworkError::Reverted {
                tx_hash: "0x01".to_string(),
            });
        let operator = ScriptedOperator::new().confirm_with(true);
        let mut orchestrator = BatchOrchestrator::new(&network, &operator, settings(&dir));

        let report = orchestrator.run(account(), records()).await;

        assert!(matches!(
            report.error,
            Some(DisburseError::TransferFailed { .. })
        ));
        let statuses: Vec<TransferStatus> =
            report.ledger.entries().iter().map(|entry| entry.status).collect();
        assert_eq!(statuses, vec![TransferStatus::Failed, TransferStatus::Pending]);
        assert_eq!(network.submitted(), vec![ALICE.to_string()]);
    }

    #[tokio::test]
    async fn test_flush_failure_is_reported_separately() {
        let dir = TempDir::new().unwrap();
        // A regular file where the output directory should be
        let blocked = dir.path().join("not-a-dir");
        std::fs::write(&blocked, "").unwrap();

        let network = MockNetwork::new(SENDER).with_balance("ETH", Decimal::from(10));
        let operator = ScriptedOperator::new().confirm_with(true);
        let mut orchestrator = BatchOrchestrator::new(
            &network,
            &operator,
            BatchSettings {
                output_dir: blocked,
                ..settings(&dir)
            },
        );

        let report = orchestrator.run(account(), records()).await;

        assert_eq!(report.state, SessionState::Completed);
        assert!(matches!(
            report.flush,
            Err(DisburseError::PersistenceError { .. })
        ));
        assert_eq!(report.ledger.len(), 2);
        assert!(matches!(
            report.into_result(),
            Err(DisburseError::PersistenceError { .. })
        ));
    }
}
