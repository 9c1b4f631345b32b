//! ILR residence tracker CLI library.
//!
//! This crate provides the CLI interface for the residence day tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, PolicyArg};
pub use config::CliConfig;
