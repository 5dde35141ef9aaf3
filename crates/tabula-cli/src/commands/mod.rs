//! Subcommand handlers.

pub mod columns;
pub mod generate;
pub mod query;
