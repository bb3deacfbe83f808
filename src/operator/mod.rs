//! Operator prompt implementations
//!
//! - `terminal` - Interactive prompts on stdin/stdout
//! - `scripted` - Queued answers for tests

pub mod scripted;
pub mod terminal;

pub use scripted::ScriptedOperator;
pub use terminal::{parse_confirmation, PromptOperator, TerminalOperator};
