//! Error types and classification for keysweep.
//!
//! This crate provides:
//! - [`SweepError`] - Top-level error enum for all enumeration errors
//! - [`ErrorCategory`] for retry decision making
//! - [`classify`] - classification logic used by the retrying store decorator

use thiserror::Error;

/// Top-level error type for keysweep.
#[derive(Error, Debug)]
pub enum SweepError {
    /// Network-level failures: timeouts, DNS, connection resets, dispatch.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credential or permission failures.
    #[error("Auth error: {0}")]
    Auth(String),

    /// Malformed or unexpected store responses.
    #[error("Store error: {0}")]
    Store(String),

    /// The consumer stopped accepting entries mid-enumeration.
    #[error("Consumer aborted: {0}")]
    ConsumerAbort(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error classification for retry decisions.
///
/// Used by the retrying store decorator to determine whether a failed
/// listing call is worth reissuing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient error - retry with exponential backoff
    ///
    /// Examples: network timeout, S3 throttling, 503
    Transient,

    /// Permanent error - never retry
    ///
    /// Examples: access denied, no such bucket, bad configuration
    Permanent,
}

/// Classify an error for retry purposes.
///
/// Transport failures are assumed transient. Auth, store-shape, and
/// configuration failures will not improve on a reissue. Wrapped generic
/// errors are classified by message the way S3 surfaces them.
pub fn classify(error: &SweepError) -> ErrorCategory {
    match error {
        SweepError::Transport(_) => ErrorCategory::Transient,
        SweepError::Auth(_) => ErrorCategory::Permanent,
        SweepError::Store(_) => ErrorCategory::Permanent,
        SweepError::ConsumerAbort(_) => ErrorCategory::Permanent,
        SweepError::Config(_) => ErrorCategory::Permanent,
        SweepError::Other(e) => classify_anyhow_error(e),
    }
}

fn classify_anyhow_error(error: &anyhow::Error) -> ErrorCategory {
    let err_string = error.to_string().to_lowercase();

    if err_string.contains("slowdown")
        || err_string.contains("toomanyrequests")
        || err_string.contains("throttl")
        || err_string.contains("timeout")
        || err_string.contains("connection")
        || err_string.contains("500")
        || err_string.contains("502")
        || err_string.contains("503")
        || err_string.contains("504")
    {
        ErrorCategory::Transient
    } else if err_string.contains("accessdenied")
        || err_string.contains("nosuchbucket")
        || err_string.contains("invalidrequest")
        || err_string.contains("403")
        || err_string.contains("404")
        || err_string.contains("400")
    {
        ErrorCategory::Permanent
    } else {
        // Unknown failures get the benefit of the doubt
        ErrorCategory::Transient
    }
}

/// Result type alias using SweepError.
pub type Result<T> = std::result::Result<T, SweepError>;
