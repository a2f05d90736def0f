//! # Messages
//!
//! Constant strings and format functions for what the user sees on stdout.

pub const PROMPT: &str = "You: ";
pub const GOODBYE: &str = "Goodbye!";
pub const CONNECTED_TOOLS: &str = "Connected to server with tools:";
pub const NO_TOOLS: &str = "  (no tools advertised)";
pub const WELCOME: &str = "MCP client started! Type your queries or 'exit' to quit.";

/// Printed with `writeln!`, so the answer is followed by a blank line.
pub fn assistant_answer(answer: &str) -> String {
    format!("Assistant: {answer}\n")
}

pub fn turn_failed(err: &str) -> String {
    format!("Error: {err}")
}

pub fn tool_line(name: &str, description: &str) -> String {
    format!("  - {name}: {description}")
}

pub fn error_displaying_result(detail: &str) -> String {
    format!("[Error displaying result] {detail}")
}
