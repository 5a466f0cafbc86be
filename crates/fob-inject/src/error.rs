//! Error types for structural injection

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while injecting into a script or utility module
#[derive(Error, Debug, Diagnostic)]
pub enum InjectError {
    /// Source text (input or fragment) failed to parse
    #[error("Parse failed: {context}{}", reason.as_ref().map(|r| format!(" - {}", r)).unwrap_or_default())]
    #[diagnostic(code(fob::inject::parse_failed))]
    Parse {
        context: String,
        reason: Option<String>,
    },

    /// A splice produced text that no longer parses; the tree was left unchanged
    #[error("Injection into '{section}' produced invalid code - {reason}")]
    #[diagnostic(
        code(fob::inject::invalid_result),
        help("check that the injected fragment is a complete statement or property")
    )]
    InvalidResult { section: String, reason: String },

    /// The default export is not an options object literal
    #[error("No options object found in default export")]
    #[diagnostic(code(fob::inject::options_not_found))]
    OptionsObjectNotFound,

    /// A section exists but its value is not the shape the merger extends
    #[error("Section '{section}' has unexpected shape, expected {expected}")]
    #[diagnostic(code(fob::inject::unexpected_shape))]
    UnexpectedShape {
        section: String,
        expected: &'static str,
    },

    /// The source formatter rejected generated text
    #[error("Formatting failed: {reason}")]
    #[diagnostic(code(fob::inject::format_failed))]
    Format { reason: String },

    /// SFC script block missing or malformed
    #[error("Script block error: {0}")]
    #[diagnostic(code(fob::inject::script_block))]
    ScriptBlock(String),

    /// Configuration could not be extracted
    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(fob::inject::config))]
    Config(String),

    /// File-system failure
    #[error("I/O error at {}: {source}", path.display())]
    #[diagnostic(code(fob::inject::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InjectError {
    /// Create a Parse error
    pub fn parse(context: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            reason: None,
        }
    }

    /// Create a Parse error with reason
    pub fn parse_with_reason(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            reason: Some(reason.into()),
        }
    }

    /// Create an UnexpectedShape error
    pub fn unexpected_shape(section: impl Into<String>, expected: &'static str) -> Self {
        Self::UnexpectedShape {
            section: section.into(),
            expected,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for injection operations
pub type Result<T> = std::result::Result<T, InjectError>;
