//! # kaspa-rest-client
//!
//! Async client library for the Kaspa block explorer REST API.
//!
//! ## Design Philosophy
//!
//! kaspa-rest-client is designed to be:
//! - **Total** - every operation returns a `Result`; transport faults,
//!   bad status codes, and malformed payloads never escape as panics
//! - **Cancellable** - every call takes a cancellation token, composed with
//!   a fresh per-call timeout; long retrievals can be stopped at any point
//! - **Lenient on the wire** - numeric fields decode from JSON strings,
//!   JSON numbers, or null, as the explorer actually emits them
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use kaspa_rest_client::{ClientConfig, KaspaClient};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KaspaClient::new(ClientConfig::default());
//!     let cancel = CancellationToken::new();
//!
//!     let balance = client
//!         .balance(
//!             "kaspa:qqkqkzjvr7zwxxmjxjkmxxdwju9kjs6e9u82uh59z07vgaks6gg62v8707g73",
//!             &cancel,
//!         )
//!         .await?;
//!     println!("balance: {} sompi", balance.balance);
//!
//!     Ok(())
//! }
//! ```
//!
//! Long-running retrievals — like walking every transaction of an address
//! through the paginated endpoint — can be wrapped in a
//! [`Job`](job::Job) to make them observable and stoppable while they run;
//! see the [`client`] module documentation for an example.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Explorer API client (endpoint groups)
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// HTTP request pipeline
pub mod http;
/// Background job supervision
pub mod job;
/// Lenient numeric JSON decoding
pub mod json;
/// Cursor-paginated retrieval
pub mod paging;
/// Shared wire types
pub mod types;
/// Utility functions and chain constants
pub mod utils;
/// Address and hash syntax validation
pub mod validate;

// Re-export commonly used types
pub use client::KaspaClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::RequestPipeline;
pub use job::{Job, JobRecord, JobState};
pub use paging::{PageDirection, PageWalk, fetch_all_pages};
pub use types::{
    FullTransaction, Outpoint, ResolvePreviousOutpoints, ScriptPublicKey, TransactionInput,
    TransactionOutput, UtxoEntry,
};
