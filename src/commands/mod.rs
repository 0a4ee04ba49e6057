//! Command implementations for the CLI
//!
//! This module contains the implementation of all CLI commands:
//! - serve: Start the HTTP server
//! - rank: Rank providers from the terminal
//! - options: List selector labels
//! - check: Validate configuration and artifacts
//! - config: Configuration display and validation

pub mod check;
pub mod config;
pub mod options;
pub mod rank;
pub mod serve;
