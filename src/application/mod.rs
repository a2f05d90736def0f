//! # Application Layer
//!
//! Orchestrates the business logic. Contains the tool-calling bridge: the
//! transcript, the tool catalog, the completion cycle and the interactive loop.

pub mod catalog;
pub mod chat;
pub mod context;
pub mod cycle;
pub mod logging;
pub mod transcript;

#[cfg(test)]
pub(crate) mod testing;
