use serde_json::Value;
use std::io::{self, Read};
use tracing::debug;

/// Attempt to read a JSON document from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive) or the pipe is empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    debug!(bytes = buffer.len(), "read piped stdin");

    parse_piped(&buffer)
}

fn parse_piped(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse stdin as JSON: {e}"))?;
    Ok(Some(value))
}
