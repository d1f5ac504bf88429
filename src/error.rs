//! Structured error types for exam paper rendering.
//!
//! Four variants cover the real error sources: JSON parsing, an unusable
//! drawing font, unusable page geometry, and I/O when writing artifacts.

use thiserror::Error;

/// The unified error type returned by all public API functions.
#[derive(Debug, Error)]
pub enum PaperError {
    /// JSON input failed to parse as an exam paper (or config).
    #[error("Failed to parse document: {source}{}", fmt_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// The requested font family cannot be drawn. Terminal for the
    /// generation attempt; nothing is laid out.
    #[error("Font error: {0}")]
    Font(String),
    /// Page geometry cannot hold any content.
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn fmt_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for PaperError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the exam paper schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        PaperError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_carries_hint() {
        let err: PaperError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse document"));
        assert!(msg.contains("trailing commas"));
    }

    #[test]
    fn eof_error_hint() {
        let err: PaperError = serde_json::from_str::<serde_json::Value>("{\"a\": ")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn parse_error_exposes_source() {
        use std::error::Error as _;
        let err: PaperError = serde_json::from_str::<serde_json::Value>("[")
            .unwrap_err()
            .into();
        assert!(err.source().is_some());
    }
}
