//! Error types and retry classification for the NSE client.
//!
//! This module provides:
//! - [`NseError`]: The error enum for every public operation
//! - [`RetryClass`]: Classification separating transient failures from input errors
//! - [`CodeKind`]: What kind of code an [`NseError::UnknownCode`] refers to

mod retry;

pub use retry::RetryClass;

use std::fmt;

use thiserror::Error;

/// The reference list a caller-supplied code was checked against.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CodeKind {
    /// An equity symbol from the symbol directory.
    Symbol,
    /// An index name, or a gainers/losers category selector.
    Index,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol => write!(f, "symbol"),
            Self::Index => write!(f, "index"),
        }
    }
}

/// Errors that can occur while talking to the exchange.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method.
#[derive(Error, Debug)]
pub enum NseError {
    /// The request never completed: connection refused, TLS failure,
    /// protocol error, or a failed session bootstrap.
    #[error("Transport error for {url}: {message}")]
    Transport {
        /// The URL being requested
        url: String,
        /// The underlying client error
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("Timeout: {url}")]
    Timeout {
        /// The URL being requested
        url: String,
    },

    /// The exchange answered with a non-2xx status where a body was needed.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The URL being requested
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// The exchange answered but the body was empty.
    #[error("No response received from {url}")]
    EmptyResponse {
        /// The URL being requested
        url: String,
    },

    /// The caller supplied a code absent from the reference data.
    /// Retrying with the same code will not help.
    #[error("Unknown {kind} code: {code}")]
    UnknownCode {
        /// Which reference list was searched
        kind: CodeKind,
        /// The normalized code that was looked up
        code: String,
    },

    /// The payload did not have the expected JSON or CSV shape.
    #[error("Failed to parse {context}: {message}")]
    Parse {
        /// What was being decoded
        context: String,
        /// Why decoding failed
        message: String,
    },

    /// A result could not be rendered as JSON text.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration value was malformed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl NseError {
    /// Build a [`NseError::Transport`] or [`NseError::Timeout`] from a reqwest error.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Build a [`NseError::Parse`] with the given context.
    pub(crate) fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use nse_market_data::errors::{CodeKind, NseError, RetryClass};
    ///
    /// let error = NseError::Timeout { url: "https://www.nseindia.com".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Retryable);
    ///
    /// let error = NseError::UnknownCode { kind: CodeKind::Index, code: "NOPE".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::HttpStatus { .. }
            | Self::EmptyResponse { .. } => RetryClass::Retryable,

            Self::UnknownCode { .. }
            | Self::Parse { .. }
            | Self::Serialization(_)
            | Self::Config(_) => RetryClass::Never,
        }
    }

    /// True for failures where the provider was unreachable or silent.
    pub fn is_transient(&self) -> bool {
        self.retry_class() == RetryClass::Retryable
    }

    /// True when the caller's code was not found in the reference data.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::UnknownCode { .. })
    }
}
