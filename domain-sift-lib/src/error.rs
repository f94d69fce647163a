//! Error handling for batch domain checking.
//!
//! Per-domain lookup failures are not errors in this library: they fold into
//! the signal types in [`crate::types`] and bias the verdict toward
//! "available". This module covers the failures that should stop a run
//! before it starts or after it finishes: bad configuration, unreadable
//! input, unwritable output, and client construction.

use std::fmt;

/// Main error type for domain-sift operations.
#[derive(Debug, Clone)]
pub enum SiftError {
    /// Configuration errors (invalid settings, malformed config files)
    Config { message: String },

    /// File I/O errors when reading domain lists or writing result files
    File { path: String, message: String },

    /// Network client setup errors (TLS backend, resolver construction)
    Network {
        message: String,
        source: Option<String>,
    },
}

impl SiftError {
    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::File {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl fmt::Display for SiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::File { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Network { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for SiftError {}
