//! LODsyndesisIE command-line client — annotate text with linked-data entities.

pub mod commands;
pub mod config;
pub mod demo;
pub mod output;
pub mod repl;

pub use commands::{execute, Outcome, Request};
pub use config::resolve_client_config;
