//! Process lifecycle
//!
//! `SessionRunner` checks the node once, then loops: ask for a list file,
//! parse it, open the account, run the batch, report, and ask whether to stop.
//! The first error of any kind ends the loop.

use crate::core::orchestrator::{BatchOrchestrator, BatchSettings, SessionReport};
use crate::core::traits::{NetworkClient, Operator};
use crate::io::{ledger_to_string, parse_list_file};
use crate::types::{Credentials, DisburseError, TransferStatus};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const LIST_PATH_PROMPT: &str = "What's list file path?";
pub const EXIT_PROMPT: &str = "Do you want to exit (type No to continue)?";

pub struct SessionRunner<'a, N: NetworkClient + ?Sized, O: Operator + ?Sized> {
    network: &'a N,
    operator: &'a O,
    credentials: Credentials,
    default_input_path: PathBuf,
    settings: BatchSettings,
}

impl<'a, N, O> SessionRunner<'a, N, O>
where
    N: NetworkClient + ?Sized,
    O: Operator + ?Sized,
{
    pub fn new(
        network: &'a N,
        operator: &'a O,
        credentials: Credentials,
        default_input_path: PathBuf,
        settings: BatchSettings,
    ) -> Self {
        SessionRunner {
            network,
            operator,
            credentials,
            default_input_path,
            settings,
        }
    }

    /// Check the node once before any session starts
    pub async fn check_connectivity(&self) -> Result<u64, DisburseError> {
        let height = self
            .network
            .block_height()
            .await
            .map_err(|cause| DisburseError::ConnectivityError { cause })?;
        info!(
            outcome = "success",
            "Connected to node; current block number {}", height
        );
        Ok(height)
    }

    /// Run sessions until the operator chooses to exit
    ///
    /// Returns the number of completed sessions.
    pub async fn run(&self) -> Result<usize, DisburseError> {
        self.check_connectivity().await?;

        let mut completed = 0;
        loop {
            self.run_session().await?;
            completed += 1;

            if self.operator.confirm(EXIT_PROMPT, true).await? {
                info!("Terminating program, good luck!");
                return Ok(completed);
            }
        }
    }

    /// Run one session end to end
    ///
    /// # Errors
    ///
    /// Parse errors before anything is sent; otherwise the batch error, or the
    /// persistence error if the batch succeeded but its log could not be written.
    pub async fn run_session(&self) -> Result<SessionReport, DisburseError> {
        let default_path = self.default_input_path.display().to_string();
        let answer = self
            .operator
            .ask_text(LIST_PATH_PROMPT, &default_path)
            .await?;

        let records = parse_list_file(Path::new(&answer), |address| {
            self.network.is_valid_address(address)
        })?;

        let account = self
            .network
            .open_account(self.credentials.reissue())
            .map_err(|e| DisburseError::config(format!("cannot open sending account: {}", e)))?;

        let mut orchestrator =
            BatchOrchestrator::new(self.network, self.operator, self.settings.clone());
        let report = orchestrator.run(account, records).await;

        surface(&report);
        report.into_result()
    }
}

/// Log the session outcome; dump the ledger if it could not be persisted
///
/// The error returned by `SessionReport::into_result` is left to the caller to
/// report, so it is not logged here.
fn surface(report: &SessionReport) {
    match &report.flush {
        Ok(path) => info!("Session log written to {}", path.display()),
        Err(e) => {
            // Masked by the batch error in `into_result`
            if report.error.is_some() {
                error!("{}", e);
            }
            match ledger_to_string(report.ledger.entries()) {
                Ok(lines) => {
                    for line in lines.lines() {
                        error!(entry = line, "Unsaved session log entry");
                    }
                }
                Err(reason) => error!("Session log entries could not be rendered: {}", reason),
            }
        }
    }

    info!(
        state = %report.state,
        "{} confirmed, {} failed, {} not attempted",
        report.count(TransferStatus::Confirmed),
        report.count(TransferStatus::Failed),
        report.count(TransferStatus::Pending)
    );

    if report.error.as_ref().is_some_and(DisburseError::is_batch_error) {
        warn!("Batch stopped early; the session log has the status of every record");
    }
}
