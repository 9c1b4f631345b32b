//! CLI subcommand implementations.

pub mod day;
pub mod init;
pub mod report;
pub mod status;
pub mod trips;
pub mod util;
pub mod visas;
