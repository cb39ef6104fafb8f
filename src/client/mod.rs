//! Explorer API client (decomposed into endpoint-group submodules)
//!
//! [`KaspaClient`] is the entry point of the crate. It is cheap to clone —
//! the underlying HTTP client and codec configuration are shared, immutable
//! after construction, and safe to use from any number of concurrent tasks
//! or background jobs without locking.
//!
//! Every method takes a [`CancellationToken`]; pass a fresh token when the
//! caller has no stop source of its own. To run a retrieval as an observable
//! background job, move a clone of the client into a
//! [`Job`](crate::job::Job):
//!
//! ```no_run
//! use kaspa_rest_client::{ClientConfig, KaspaClient};
//! use kaspa_rest_client::client::FullTransactionsPageRequest;
//! use kaspa_rest_client::job::Job;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let client = KaspaClient::new(ClientConfig::default());
//! let request = FullTransactionsPageRequest::new(
//!     "kaspa:qqkqkzjvr7zwxxmjxjkmxxdwju9kjs6e9u82uh59z07vgaks6gg62v8707g73",
//! );
//!
//! let job = Arc::new(Job::new("full-transactions", move |cancel| async move {
//!     client.full_transactions_page(request, &cancel).await
//! }));
//! let handle = job.spawn(CancellationToken::new());
//! # handle.await.ok();
//! # }
//! ```

mod addresses;
mod blocks;
mod network;
mod transactions;

pub use addresses::{
    AddressBalance, AddressUtxo, FullTransactionsPageRequest, TransactionsCount,
};
pub use blocks::{
    Block, BlockExtra, BlockHeader, BlockParents, BlockTransaction, BlockTransactionOutput,
    BlockTransactionVerboseData, BlockVerboseData, BlocksResponse,
};
pub use network::{
    BlockReward, BlueScore, CoinSupply, DatabaseStatus, FeeBucket, FeeEstimate, Halving, Hashrate,
    HealthState, KaspadInfo, KaspadServer, NetworkInfo, Price,
};
pub use transactions::{
    BlueScoreWindow, SubmitScriptPublicKey, SubmitTransactionInput, SubmitTransactionOutput,
    SubmitTransactionRequest, SubmitTransactionResponse, Transaction, TransactionMass,
    TransactionSearchRequest,
};

use crate::config::ClientConfig;
use crate::http::RequestPipeline;

/// Client for the Kaspa block explorer REST API
///
/// Construct once and clone freely; see the [module documentation](self).
#[derive(Clone, Debug)]
pub struct KaspaClient {
    config: ClientConfig,
    pipeline: RequestPipeline,
}

impl KaspaClient {
    /// Creates a client from configuration
    pub fn new(config: ClientConfig) -> Self {
        let pipeline = RequestPipeline::new(&config);
        Self { config, pipeline }
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying request pipeline, for custom queries and traversals
    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }
}
