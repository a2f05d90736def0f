//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (`ToolSession`, `CompletionProvider`).

pub mod llm;
pub mod mcp;
pub mod supabase;
