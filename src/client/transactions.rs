//! Transaction endpoints — lookup, search, mass calculation, and submission.

use crate::error::Result;
use crate::types::{FullTransaction, Outpoint, ResolvePreviousOutpoints};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::form_urlencoded;

use super::KaspaClient;

/// Search request for the transaction search endpoint
///
/// Either a list of transaction IDs or an accepting blue-score window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSearchRequest {
    /// Transaction IDs to look up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_ids: Option<Vec<String>>,
    /// Accepting blue-score window to search within
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepting_blue_scores: Option<BlueScoreWindow>,
}

/// Half-open accepting blue-score window `[gte, lt)`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueScoreWindow {
    /// Inclusive lower bound
    pub gte: u64,
    /// Exclusive upper bound
    pub lt: u64,
}

/// A raw transaction to submit or weigh
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction version
    pub version: u32,
    /// Inputs spending previous outputs
    pub inputs: Vec<SubmitTransactionInput>,
    /// New outputs
    pub outputs: Vec<SubmitTransactionOutput>,
    /// Lock time
    pub lock_time: u64,
    /// Subnetwork the transaction belongs to
    pub subnetwork_id: String,
}

/// An input of a raw transaction
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionInput {
    /// Output being spent
    pub previous_outpoint: Outpoint,
    /// Hex-encoded signature script
    pub signature_script: String,
    /// Input sequence
    pub sequence: u64,
    /// Number of signature operations
    pub sig_op_count: u32,
}

/// An output of a raw transaction
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionOutput {
    /// Amount in sompi
    pub amount: u64,
    /// Locking script
    pub script_public_key: SubmitScriptPublicKey,
}

/// Locking script of a submitted output
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScriptPublicKey {
    /// Script version
    pub version: u32,
    /// Hex-encoded script
    pub script_public_key: String,
}

/// Submission request wrapping a raw transaction
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionRequest {
    /// The transaction to submit
    pub transaction: Transaction,
    /// Whether the node may accept the transaction as an orphan
    #[serde(default)]
    pub allow_orphan: bool,
}

/// Response of the submission endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionResponse {
    /// ID assigned to the accepted transaction
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Rejection reason, when not accepted
    #[serde(default)]
    pub error: Option<String>,
}

/// Mass of a transaction as weighed by the node
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionMass {
    /// Overall mass
    #[serde(default, with = "crate::json::lenient_u64")]
    pub mass: u64,
    /// Storage component
    #[serde(default, with = "crate::json::lenient_u64")]
    pub storage_mass: u64,
    /// Compute component
    #[serde(default, with = "crate::json::lenient_u64")]
    pub compute_mass: u64,
}

impl KaspaClient {
    /// Fetches one indexed transaction by ID
    pub async fn transaction(
        &self,
        transaction_id: &str,
        resolve_previous_outpoints: ResolvePreviousOutpoints,
        cancel: &CancellationToken,
    ) -> Result<FullTransaction> {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair(
            "resolve_previous_outpoints",
            resolve_previous_outpoints.as_str(),
        );
        let query = format!(
            "transactions/{}?{}",
            urlencoding::encode(transaction_id),
            params.finish()
        );

        let response = self.pipeline().get(&query, cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Searches indexed transactions by ID list or blue-score window
    pub async fn search_transactions(
        &self,
        request: &TransactionSearchRequest,
        fields: &str,
        resolve_previous_outpoints: ResolvePreviousOutpoints,
        cancel: &CancellationToken,
    ) -> Result<Vec<FullTransaction>> {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair(
            "resolve_previous_outpoints",
            resolve_previous_outpoints.as_str(),
        );
        if !fields.is_empty() {
            params.append_pair("fields", fields);
        }
        let query = format!("transactions/search?{}", params.finish());

        let response = self.pipeline().post(&query, request, cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Weighs a raw transaction without submitting it
    pub async fn transaction_mass(
        &self,
        transaction: &Transaction,
        cancel: &CancellationToken,
    ) -> Result<TransactionMass> {
        let response = self
            .pipeline()
            .post("transactions/mass", transaction, cancel)
            .await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Submits a raw transaction to the network
    pub async fn submit_transaction(
        &self,
        request: &SubmitTransactionRequest,
        replace_by_fee: bool,
        cancel: &CancellationToken,
    ) -> Result<SubmitTransactionResponse> {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("replaceByFee", &replace_by_fee.to_string());
        let query = format!("transactions?{}", params.finish());

        let response = self.pipeline().post(&query, request, cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }
}
