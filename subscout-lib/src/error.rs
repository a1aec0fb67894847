//! Error handling for subdomain discovery.
//!
//! This module defines the library error type covering the fatal, pre-run
//! failure modes. Per-candidate lookup failures are not errors: they are
//! absorbed into [`crate::LookupOutcome`] and never abort a scan.

use std::fmt;

/// Main error type for scan operations.
///
/// Only two classes of failure surface here: configuration problems and
/// candidate-source problems, both detected before any lookup is issued.
#[derive(Debug, Clone)]
pub enum SubscoutError {
    /// Invalid configuration (zero concurrency, zero timeout, ...)
    Config { message: String },

    /// Invalid base domain format
    InvalidDomain { domain: String, reason: String },

    /// Wordlist file unreadable or empty
    Source { path: String, message: String },

    /// Failure constructing the system DNS resolver
    ResolverInit { message: String },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl SubscoutError {
    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new candidate-source error.
    pub fn source<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Source {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new resolver initialization error.
    pub fn resolver_init<M: Into<String>>(message: M) -> Self {
        Self::ResolverInit {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl fmt::Display for SubscoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::Source { path, message } => {
                write!(f, "Wordlist error at '{}': {}", path, message)
            }
            Self::ResolverInit { message } => {
                write!(f, "Resolver setup failed: {}", message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for SubscoutError {}

impl From<std::io::Error> for SubscoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}
