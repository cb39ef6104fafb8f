//! Shared wire types for the explorer API
//!
//! The explorer mixes two naming conventions: node-style endpoints use
//! camelCase, the indexed transaction schema uses snake_case. Types here
//! mirror the wire exactly and apply lenient numeric coercion to every
//! integer field the service is known to encode inconsistently (amounts,
//! scores, timestamps, mass).

use serde::{Deserialize, Serialize};

/// How far the service should resolve previous outpoints when returning
/// transaction inputs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvePreviousOutpoints {
    /// Do not resolve previous outpoints
    #[default]
    No,
    /// Resolve only the address and amount
    Light,
    /// Resolve the full previous output
    Full,
}

impl ResolvePreviousOutpoints {
    /// Query-parameter value for this option
    pub fn as_str(self) -> &'static str {
        match self {
            ResolvePreviousOutpoints::No => "no",
            ResolvePreviousOutpoints::Light => "light",
            ResolvePreviousOutpoints::Full => "full",
        }
    }
}

/// Reference to a transaction output
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outpoint {
    /// Transaction that produced the output
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Output index within that transaction
    #[serde(default, with = "crate::json::lenient_u32")]
    pub index: u32,
}

/// Script public key wrapper as returned by the UTXO endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPublicKey {
    /// Hex-encoded script
    #[serde(default)]
    pub script_public_key: Option<String>,
}

/// One unspent output entry
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoEntry {
    /// Amount in sompi
    #[serde(default, with = "crate::json::lenient_u64")]
    pub amount: u64,
    /// Locking script of the output
    #[serde(default)]
    pub script_public_key: Option<ScriptPublicKey>,
    /// DAA score of the block that accepted the output
    #[serde(default, with = "crate::json::lenient_u64")]
    pub block_daa_score: u64,
    /// Whether the output was produced by a coinbase transaction
    #[serde(default)]
    pub is_coinbase: bool,
}

/// A fully indexed transaction as returned by the explorer
///
/// This is the item type of both the paginated address-transaction endpoints
/// and the transaction search endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FullTransaction {
    /// Subnetwork the transaction belongs to
    #[serde(default)]
    pub subnetwork_id: Option<String>,
    /// Transaction ID
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Transaction hash
    #[serde(default)]
    pub hash: Option<String>,
    /// Transaction mass
    #[serde(default, with = "crate::json::lenient_u64")]
    pub mass: u64,
    /// Hex-encoded payload
    #[serde(default)]
    pub payload: Option<String>,
    /// Hashes of the blocks containing the transaction
    #[serde(default)]
    pub block_hash: Option<Vec<String>>,
    /// Block time in epoch milliseconds; the chronological ordering key of
    /// paginated retrievals
    #[serde(default, with = "crate::json::lenient_u64")]
    pub block_time: u64,
    /// Whether the transaction is accepted by the virtual chain
    #[serde(default)]
    pub is_accepted: bool,
    /// Hash of the accepting block, when accepted
    #[serde(default)]
    pub accepting_block_hash: Option<String>,
    /// Blue score of the accepting block
    #[serde(default, with = "crate::json::lenient_u64")]
    pub accepting_block_blue_score: u64,
    /// Timestamp of the accepting block in epoch milliseconds
    #[serde(default, with = "crate::json::lenient_u64")]
    pub accepting_block_time: u64,
    /// Transaction inputs; absent when the projection excludes them
    #[serde(default)]
    pub inputs: Option<Vec<TransactionInput>>,
    /// Transaction outputs; absent when the projection excludes them
    #[serde(default)]
    pub outputs: Option<Vec<TransactionOutput>>,
}

/// An input of an indexed transaction
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Transaction this input belongs to
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Input index
    #[serde(default, with = "crate::json::lenient_u32")]
    pub index: u32,
    /// Hash of the transaction that produced the spent output
    #[serde(default)]
    pub previous_outpoint_hash: Option<String>,
    /// Index of the spent output, kept as the wire string
    #[serde(default)]
    pub previous_outpoint_index: Option<String>,
    /// Spent output, resolved when requested via
    /// [`ResolvePreviousOutpoints::Full`]
    #[serde(default)]
    pub previous_outpoint_resolved: Option<Box<TransactionOutput>>,
    /// Address of the spent output, resolved when requested
    #[serde(default)]
    pub previous_outpoint_address: Option<String>,
    /// Amount of the spent output in sompi, resolved when requested
    #[serde(default, with = "crate::json::lenient_u64")]
    pub previous_outpoint_amount: u64,
    /// Hex-encoded signature script
    #[serde(default)]
    pub signature_script: Option<String>,
    /// Number of signature operations
    #[serde(default, with = "crate::json::lenient_u32")]
    pub sig_op_count: u32,
}

/// An output of an indexed transaction
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Transaction this output belongs to
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Output index
    #[serde(default, with = "crate::json::lenient_u32")]
    pub index: u32,
    /// Amount in sompi
    #[serde(default, with = "crate::json::lenient_u64")]
    pub amount: u64,
    /// Hex-encoded locking script
    #[serde(default)]
    pub script_public_key: Option<String>,
    /// Address encoded by the locking script
    #[serde(default)]
    pub script_public_key_address: Option<String>,
    /// Script type
    #[serde(default)]
    pub script_public_key_type: Option<String>,
}
