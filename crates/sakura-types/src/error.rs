//! Error types for the sakura assistant.
//!
//! Provides [`SakuraError`] as the top-level error type shared by the
//! library crates. The binary wraps it in `anyhow` at the edges.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the sakura assistant.
///
/// Variants are grouped into recoverable failures (the request can be
/// retried or reported to Master) and fatal ones (startup cannot proceed).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SakuraError {
    // ── Recoverable ──────────────────────────────────────────────────

    /// An operation exceeded its deadline.
    #[error("operation timed out: {operation}")]
    Timeout {
        /// Human-readable name of the operation that timed out.
        operation: String,
    },

    /// The language model backend returned an error.
    #[error("provider error: {message}")]
    Provider {
        /// Provider-supplied error message.
        message: String,
    },

    /// A tool invocation failed.
    #[error("tool error: {tool}: {message}")]
    Tool {
        /// Name of the failing tool.
        tool: String,
        /// What went wrong.
        message: String,
    },

    /// Recording or transcribing audio failed.
    #[error("voice error: {0}")]
    Voice(String),

    // ── Fatal ────────────────────────────────────────────────────────

    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found at '{}'", path.display())]
    ConfigNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, SakuraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display() {
        let err = SakuraError::Timeout {
            operation: "llm_call".into(),
        };
        assert_eq!(err.to_string(), "operation timed out: llm_call");
    }

    #[test]
    fn config_not_found_display_includes_path() {
        let err = SakuraError::ConfigNotFound {
            path: PathBuf::from("/tmp/missing.json"),
        };
        assert_eq!(
            err.to_string(),
            "configuration file not found at '/tmp/missing.json'"
        );
    }

    #[test]
    fn tool_error_display() {
        let err = SakuraError::Tool {
            tool: "search_in_file".into(),
            message: "grep missing".into(),
        };
        assert_eq!(err.to_string(), "tool error: search_in_file: grep missing");
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SakuraError = io_err.into();
        assert!(matches!(err, SakuraError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad}}").unwrap_err();
        let err: SakuraError = json_err.into();
        assert!(matches!(err, SakuraError::Json(_)));
    }
}
