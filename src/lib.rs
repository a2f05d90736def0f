//! # mcp-bridge
//!
//! Bridges a chat-completion LLM to the tools of an MCP server: the model
//! sees the server's tool catalog, requests calls, and the bridge runs them
//! and feeds the results back for a final answer.
//!
//! - Domain: configuration, types, traits and errors
//! - Infrastructure: LLM providers, the MCP client session, Supabase REST
//! - Application: transcript, tool catalog, completion cycle, chat loop, logging
//! - Interface: command line and command handlers
//! - Servers: the calculator and Supabase MCP servers

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod servers;
pub mod strings;
