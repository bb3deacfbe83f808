//! Core business logic module
//!
//! This module contains the transfer-orchestration pipeline:
//! - `traits` - Network and operator abstractions
//! - `plan` - Batch plan and exact per-asset totals
//! - `fee_guard` - Per-transfer fee ceiling
//! - `funds_validator` - Pre-flight balance check
//! - `executor` - Sign, submit and confirm a single transfer
//! - `session_ledger` - Ordered session log, flushed once
//! - `orchestrator` - Session state machine tying the above together

pub mod executor;
pub mod fee_guard;
pub mod funds_validator;
pub mod orchestrator;
pub mod plan;
pub mod session_ledger;
pub mod traits;

pub use executor::{Confirmation, TransferExecutor};
pub use fee_guard::FeeGuard;
pub use funds_validator::validate_funds;
pub use orchestrator::{BatchOrchestrator, BatchSettings, SessionReport, SessionState};
pub use plan::BatchPlan;
pub use session_ledger::SessionLedger;
pub use traits::{NetworkClient, Operator};
