//! # Interface Layer
//!
//! Command line parsing and the handlers behind each subcommand.

pub mod cli;
pub mod commands;
