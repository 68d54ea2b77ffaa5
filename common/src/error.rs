//! # Error Taxonomy
//!
//! Only [`ScanError`] ever reaches the caller of a scan. [`ProbeError`] is
//! produced per address and absorbed by the scanner: a host that times out or
//! refuses the connection is simply absent from the result.

use std::time::Duration;

use thiserror::Error;

/// Operation-level failures of a scan.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The base address cannot be turned into a /24 scan range.
    #[error("invalid scan range '{input}': {reason}")]
    InvalidRange { input: String, reason: String },

    /// The HTTP client backing the probes could not be built.
    #[error("failed to initialize http client: {0}")]
    Client(String),
}

impl ScanError {
    pub fn invalid_range(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Per-address probe failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    /// The identity endpoint failed or answered with an empty body.
    #[error("identity unavailable")]
    IdentityUnavailable,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
