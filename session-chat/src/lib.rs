//! # session-chat
//!
//! Argument parsing and pipeline assembly for the `session-chat` binary.

pub mod cli;

pub use cli::{build_pipeline, run_rounds, Cli, DEMO_ROUNDS, HISTORY_SLOT, SYSTEM_INSTRUCTION};
