use thiserror::Error;

use crate::codec::Convention;

/// Error types for encoding and decoding filter query strings
#[derive(Debug, Error)]
pub enum CodecError {
    #[error(
        "Can't parse filter clause '{clause}': expected <fields><operator><values>, found {matches} operator match(es)"
    )]
    ClauseParse { clause: String, matches: usize },

    #[error("Operation '{operation}' is not supported by the {convention} convention")]
    UnsupportedOperation {
        convention: Convention,
        operation: &'static str,
    },

    #[error("Invalid operator table: {0}")]
    InvalidOperatorTable(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Create a new ClauseParse error
    pub fn clause_parse(clause: impl Into<String>, matches: usize) -> Self {
        Self::ClauseParse {
            clause: clause.into(),
            matches,
        }
    }

    /// Create a new UnsupportedOperation error
    pub fn unsupported(convention: Convention, operation: &'static str) -> Self {
        Self::UnsupportedOperation {
            convention,
            operation,
        }
    }

    /// Create a new InvalidOperatorTable error
    pub fn invalid_operator_table(message: impl Into<String>) -> Self {
        Self::InvalidOperatorTable(message.into())
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this error was caused by the input handed to the codec
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::ClauseParse { .. })
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ClauseParse { .. } => ErrorCategory::Parse,
            Self::UnsupportedOperation { .. } => ErrorCategory::Unsupported,
            Self::InvalidOperatorTable(_) | Self::Configuration(_) | Self::Toml(_) => {
                ErrorCategory::Configuration
            }
            Self::Regex(_) | Self::Io(_) => ErrorCategory::System,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Unsupported,
    Configuration,
    System,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse => write!(f, "parse"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Configuration => write!(f, "configuration"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Convenience result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
