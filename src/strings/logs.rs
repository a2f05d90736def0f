//! Log lines shared by the binaries.

pub fn config_loaded(source: &str) -> String {
    format!("Loaded configuration from {source}")
}

pub fn connecting_server(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        format!("Spawning tool server: {command}")
    } else {
        format!("Spawning tool server: {command} {}", args.join(" "))
    }
}

pub fn tools_advertised(count: usize) -> String {
    format!("Server advertises {count} tool(s)")
}

pub const CHAT_START: &str = "Starting interactive chat";
pub const CHAT_END: &str = "Chat session ended";

pub fn server_starting(name: &str) -> String {
    format!("Starting {name} MCP server on stdio")
}

pub fn server_stopped(name: &str) -> String {
    format!("{name} MCP server stopped")
}
