//! Block endpoints — single block, block range, and blue-score lookup.

use crate::error::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::form_urlencoded;

use super::KaspaClient;

/// Header of a block
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    /// Header version
    #[serde(default, with = "crate::json::lenient_u32")]
    pub version: u32,
    /// Merkle root over the block's transactions
    #[serde(default)]
    pub hash_merkle_root: Option<String>,
    /// Merkle root over accepted IDs
    #[serde(default)]
    pub accepted_id_merkle_root: Option<String>,
    /// UTXO commitment hash
    #[serde(default)]
    pub utxo_commitment: Option<String>,
    /// Block timestamp in epoch milliseconds
    #[serde(default, with = "crate::json::lenient_i64")]
    pub timestamp: i64,
    /// Encoded difficulty target
    #[serde(default, with = "crate::json::lenient_u32")]
    pub bits: u32,
    /// Miner nonce
    #[serde(default, with = "crate::json::lenient_u64")]
    pub nonce: u64,
    /// DAA score of the block
    #[serde(default, with = "crate::json::lenient_u64")]
    pub daa_score: u64,
    /// Accumulated blue work, kept as the wire string
    #[serde(default)]
    pub blue_work: Option<String>,
    /// Parent hash groups, one per level
    #[serde(default)]
    pub parents: Option<Vec<BlockParents>>,
    /// Blue score of the block
    #[serde(default, with = "crate::json::lenient_u64")]
    pub blue_score: u64,
    /// Pruning point the block references
    #[serde(default)]
    pub pruning_point: Option<String>,
}

/// One level of parent hashes in a block header
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockParents {
    /// Parent hashes at this level
    #[serde(default)]
    pub parent_hashes: Option<Vec<String>>,
}

/// Verbose metadata the node attaches to a block
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockVerboseData {
    /// True when only the header was requested
    #[serde(default)]
    pub is_header_only: bool,
    /// Block hash
    #[serde(default)]
    pub hash: Option<String>,
    /// Difficulty of the block
    #[serde(default, with = "crate::json::lenient_decimal")]
    pub difficulty: Decimal,
    /// Selected parent in the DAG
    #[serde(default)]
    pub selected_parent_hash: Option<String>,
    /// IDs of the block's transactions
    #[serde(default)]
    pub transaction_ids: Option<Vec<String>>,
    /// Blue score of the block
    #[serde(default, with = "crate::json::lenient_u64")]
    pub blue_score: u64,
    /// Hashes of known children
    #[serde(default)]
    pub children_hashes: Option<Vec<String>>,
    /// Merge-set blues
    #[serde(default)]
    pub merge_set_blues_hashes: Option<Vec<String>>,
    /// Merge-set reds
    #[serde(default)]
    pub merge_set_reds_hashes: Option<Vec<String>>,
    /// Whether the block is on the selected chain
    #[serde(default)]
    pub is_chain_block: bool,
}

/// Explorer-side extra data for a block
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockExtra {
    /// Chain color ("blue"/"red"), present when requested
    #[serde(default)]
    pub color: Option<String>,
    /// Address credited by the coinbase transaction
    #[serde(default)]
    pub miner_address: Option<String>,
    /// Free-form miner tag
    #[serde(default)]
    pub miner_info: Option<String>,
}

/// A transaction as embedded in a block response
///
/// This is the node's view of a transaction; the indexed explorer view is
/// [`FullTransaction`](crate::types::FullTransaction).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTransaction {
    /// Outputs of the transaction
    #[serde(default)]
    pub outputs: Option<Vec<BlockTransactionOutput>>,
    /// Subnetwork the transaction belongs to
    #[serde(default)]
    pub subnetwork_id: Option<String>,
    /// Hex-encoded payload
    #[serde(default)]
    pub payload: Option<String>,
    /// Verbose metadata
    #[serde(default)]
    pub verbose_data: Option<BlockTransactionVerboseData>,
}

/// An output of a block-embedded transaction
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTransactionOutput {
    /// Amount in sompi
    #[serde(default, with = "crate::json::lenient_u64")]
    pub amount: u64,
    /// Locking script
    #[serde(default)]
    pub script_public_key: Option<serde_json::Value>,
    /// Verbose metadata
    #[serde(default)]
    pub verbose_data: Option<serde_json::Value>,
}

/// Verbose metadata of a block-embedded transaction
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTransactionVerboseData {
    /// Transaction ID
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Transaction hash
    #[serde(default)]
    pub hash: Option<String>,
    /// Transaction mass
    #[serde(default, with = "crate::json::lenient_u64")]
    pub compute_mass: u64,
    /// Hash of the containing block
    #[serde(default)]
    pub block_hash: Option<String>,
    /// Block time in epoch milliseconds
    #[serde(default, with = "crate::json::lenient_u64")]
    pub block_time: u64,
}

/// A block with header, optional transactions, and verbose metadata
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Block header
    #[serde(default)]
    pub header: Option<BlockHeader>,
    /// Transactions, present when requested
    #[serde(default)]
    pub transactions: Option<Vec<BlockTransaction>>,
    /// Verbose metadata
    #[serde(default)]
    pub verbose_data: Option<BlockVerboseData>,
    /// Explorer-side extra data
    #[serde(default)]
    pub extra: Option<BlockExtra>,
}

/// Response of the block-range endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocksResponse {
    /// Hashes of the returned range
    #[serde(default)]
    pub block_hashes: Option<Vec<String>>,
    /// Full blocks, present when requested
    #[serde(default)]
    pub blocks: Option<Vec<Block>>,
}

impl KaspaClient {
    /// Fetches one block by hash
    pub async fn block(
        &self,
        block_hash: &str,
        include_transactions: bool,
        include_color: bool,
        cancel: &CancellationToken,
    ) -> Result<Block> {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("includeTransactions", &include_transactions.to_string());
        params.append_pair("includeColor", &include_color.to_string());
        let query = format!(
            "blocks/{}?{}",
            urlencoding::encode(block_hash),
            params.finish()
        );

        let response = self.pipeline().get(&query, cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches blocks from a low hash upward
    pub async fn blocks(
        &self,
        low_hash: &str,
        include_blocks: bool,
        include_transactions: bool,
        cancel: &CancellationToken,
    ) -> Result<BlocksResponse> {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("lowHash", low_hash);
        params.append_pair("includeBlocks", &include_blocks.to_string());
        params.append_pair("includeTransactions", &include_transactions.to_string());
        let query = format!("blocks?{}", params.finish());

        let response = self.pipeline().get(&query, cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches the blocks at a given blue score
    pub async fn blocks_from_blue_score(
        &self,
        blue_score: u64,
        include_transactions: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<Block>> {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("blueScore", &blue_score.to_string());
        params.append_pair("includeTransactions", &include_transactions.to_string());
        let query = format!("blocks-from-bluescore?{}", params.finish());

        let response = self.pipeline().get(&query, cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_HASH: &str = "18b9a20bdbfa74e8bbf4ca757e0466b1b9bc85bb665d5a1c4a4a6e7c1a186c54";

    fn test_client(api_address: &str) -> KaspaClient {
        KaspaClient::new(ClientConfig {
            api_address: api_address.to_string(),
            ..ClientConfig::default()
        })
    }

    #[tokio::test]
    async fn test_block_decodes_header_scores() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/blocks/{TEST_HASH}")))
            .and(query_param("includeColor", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "header": {
                        "version": 1,
                        "timestamp": "1656450648874",
                        "bits": 455233226,
                        "nonce": "14797571275553019490",
                        "daaScore": "19984482",
                        "blueWork": "2d1b3f04f8a0b0d9be6",
                        "blueScore": "18483232",
                        "parents": [{"parentHashes": ["aa", "bb"]}]
                    },
                    "verboseData": {
                        "hash": "18b9a20bdbfa74e8bbf4ca757e0466b1b9bc85bb665d5a1c4a4a6e7c1a186c54",
                        "difficulty": 1212312312.124,
                        "isChainBlock": true,
                        "blueScore": "18483232"
                    },
                    "extra": {"color": "blue", "minerAddress": "kaspa:qq0"}
                }"#,
            ))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let block = client
            .block(TEST_HASH, false, true, &CancellationToken::new())
            .await
            .unwrap();

        let header = block.header.unwrap();
        assert_eq!(header.blue_score, 18_483_232);
        assert_eq!(header.nonce, 14_797_571_275_553_019_490);
        assert_eq!(header.parents.unwrap().len(), 1);
        assert_eq!(block.extra.unwrap().color.as_deref(), Some("blue"));
    }

    #[tokio::test]
    async fn test_blocks_range_query_params() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blocks"))
            .and(query_param("lowHash", TEST_HASH))
            .and(query_param("includeBlocks", "true"))
            .and(query_param("includeTransactions", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"blockHashes": ["aa", "bb"], "blocks": []}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let response = client
            .blocks(TEST_HASH, true, false, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.block_hashes.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_blocks_from_blue_score() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blocks-from-bluescore"))
            .and(query_param("blueScore", "43679173"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"header": {"blueScore": "43679173"}}]"#,
            ))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let blocks = client
            .blocks_from_blue_score(43_679_173, false, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].header.as_ref().unwrap().blue_score, 43_679_173);
    }
}
