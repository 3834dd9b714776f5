//! Commands and configuration of the `labtransfer` tool.
//!
//! Every command works against a fresh in-memory store:
//! - `check` runs a dry-run import and reports statistics or failures
//! - `normalize` imports a document and exports it again
//! - `stats` counts section elements without importing

mod commands;
mod config;

pub use commands::{check, normalize, stats, Format, NormalizeOutcome};
pub use config::CliConfig;
