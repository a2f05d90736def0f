//! # MCP Module
//!
//! Model Context Protocol client side: the session the bridge loop uses to
//! discover and invoke tools.

mod client;

pub use client::McpSession;
