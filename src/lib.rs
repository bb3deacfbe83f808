//! Batch Disbursement Library
//! # Overview
//!
//! This library sends batches of transfers listed in a tab-delimited file to an
//! Ethereum-compatible network, one at a time, with an operator in the loop.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (TransferRecord, Account, errors, etc.)
//! - [`io`] - List-file parsing and session log serialization
//! - [`core`] - Business logic components:
//!   - [`core::plan`] - Batch plan and exact per-asset totals
//!   - [`core::fee_guard`] - Hard cap on the fee of each transfer
//!   - [`core::funds_validator`] - Balance check before the first transfer
//!   - [`core::executor`] - Sign, submit and confirm one transfer
//!   - [`core::orchestrator`] - Session state machine
//!   - [`core::session_ledger`] - Ordered per-session log, flushed once
//! - [`network`] - Ethereum JSON-RPC client and an in-memory mock
//! - [`operator`] - Terminal prompts and a scripted test operator
//! - [`session`] - Connectivity check and the interactive session loop
//! - [`config`], [`logging`], [`cli`] - Process setup
//!
//! # Session Flow
//!
//! 1. Parse and validate every row; any bad row stops the session before
//!    anything is sent
//! 2. Ask the operator to confirm the totals
//! 3. Check the balance of every asset type once
//! 4. For each record in file order: quote the fee, stop the batch if it is
//!    above the ceiling, sign, submit and wait for the receipt
//! 5. Write the session log, whatever the outcome
//!
//! # Transfer States
//!
//! - `pending`: not attempted (yet, or ever, if the batch stopped earlier)
//! - `submitted`: broadcast, awaiting its receipt
//! - `confirmed`: included; carries the transaction hash
//! - `failed`: the transfer that stopped the batch; carries the reason

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod logging;
pub mod network;
pub mod operator;
pub mod session;
pub mod types;

pub use crate::core::{BatchOrchestrator, BatchSettings, SessionLedger, SessionReport, SessionState};
pub use session::SessionRunner;
pub use types::{
    Account, Credentials, DisburseError, NetworkError, TransferRecord, TransferStatus,
};
