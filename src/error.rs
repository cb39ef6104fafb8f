//! Error types for kaspa-rest-client
//!
//! Every fallible operation in the crate returns [`Result`]. Faults from the
//! transport, the JSON layer, or a job's unit of work are converted into an
//! [`Error`] variant at the component boundary — nothing panics across it.

use thiserror::Error;

/// Result type alias for kaspa-rest-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for kaspa-rest-client
///
/// Each variant carries enough context to diagnose the failure without
/// inspecting the underlying source.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection or I/O failure in the HTTP transport
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status code
    #[error("API request failed with status code {status}")]
    RequestFailed {
        /// The HTTP status code the API returned
        status: reqwest::StatusCode,
    },

    /// Malformed or out-of-range JSON payload
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The operation was canceled, either by the per-call timeout or by an
    /// external stop signal
    #[error("operation canceled")]
    Canceled,

    /// The combined base address and query did not form a valid URL
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API returned an empty or missing body where one was required
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Uncaught fault, wrapped rather than propagated raw
    #[error("unhandled fault: {0}")]
    Unhandled(String),
}

impl Error {
    /// Returns true if the error reports a cancellation rather than a fault
    pub fn is_canceled(&self) -> bool {
        matches!(self, Error::Canceled)
    }
}
