//! Network info endpoints — chain stats, supply, fees, node health.

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::KaspaClient;

/// Network-wide chain statistics
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// Network name, e.g. "kaspa-mainnet"
    #[serde(default)]
    pub network_name: Option<String>,
    /// Block count, kept as the wire string
    #[serde(default)]
    pub block_count: Option<String>,
    /// Header count, kept as the wire string
    #[serde(default)]
    pub header_count: Option<String>,
    /// Current DAG tip hashes
    #[serde(default)]
    pub tip_hashes: Option<Vec<String>>,
    /// Current difficulty
    #[serde(default, with = "crate::json::lenient_decimal")]
    pub difficulty: Decimal,
    /// Past median time in epoch milliseconds
    #[serde(default, with = "crate::json::lenient_i64")]
    pub past_median_time: i64,
    /// Parents of the virtual block
    #[serde(default)]
    pub virtual_parent_hashes: Option<Vec<String>>,
    /// Current pruning point
    #[serde(default)]
    pub pruning_point_hash: Option<String>,
    /// DAA score of the virtual block
    #[serde(default, with = "crate::json::lenient_u64")]
    pub virtual_daa_score: u64,
}

/// Blue score of the virtual selected parent
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueScore {
    /// The blue score value
    #[serde(default, with = "crate::json::lenient_u64")]
    pub blue_score: u64,
}

/// Circulating and maximum coin supply
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinSupply {
    /// Circulating supply in sompi
    #[serde(default, with = "crate::json::lenient_u64")]
    pub circulating_supply: u64,
    /// Maximum supply in sompi
    #[serde(default, with = "crate::json::lenient_u64")]
    pub max_supply: u64,
}

/// Details of the next chromatic halving
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Halving {
    /// Timestamp of the next halving in epoch milliseconds
    #[serde(default, with = "crate::json::lenient_i64")]
    pub next_halving_timestamp: i64,
    /// Human-readable date of the next halving
    #[serde(default)]
    pub next_halving_date: Option<String>,
    /// Block reward after the next halving
    #[serde(default, with = "crate::json::lenient_decimal")]
    pub next_halving_amount: Decimal,
}

/// Current network hashrate
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Hashrate {
    /// Hashrate in hashes per second
    #[serde(default, with = "crate::json::lenient_decimal")]
    pub hashrate: Decimal,
}

/// Current block reward
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockReward {
    /// Reward per block in KAS
    #[serde(default, with = "crate::json::lenient_decimal")]
    pub blockreward: Decimal,
}

/// Current token price
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Price in USD
    #[serde(default, with = "crate::json::lenient_decimal")]
    pub price: Decimal,
}

/// Status of the node backing the API
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KaspadInfo {
    /// Current mempool size
    #[serde(default, with = "crate::json::lenient_u64")]
    pub mempool_size: u64,
    /// Node software version
    #[serde(default)]
    pub server_version: Option<String>,
    /// Whether the node maintains a UTXO index
    #[serde(default)]
    pub is_utxo_indexed: bool,
    /// Whether the node is synced
    #[serde(default)]
    pub is_synced: bool,
    /// Hashed P2P identifier of the node
    #[serde(default)]
    pub p2p_id_hashed: Option<String>,
}

/// One node behind the API, as reported by the health endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KaspadServer {
    /// Host identifier
    #[serde(default)]
    pub kaspad_host: Option<String>,
    /// Node software version
    #[serde(default)]
    pub server_version: Option<String>,
    /// Whether the node maintains a UTXO index
    #[serde(default)]
    pub is_utxo_indexed: bool,
    /// Whether the node is synced
    #[serde(default)]
    pub is_synced: bool,
    /// P2P identifier of the node
    #[serde(default)]
    pub p2p_id: Option<String>,
    /// Blue score the node reports
    #[serde(default, with = "crate::json::lenient_u64")]
    pub blue_score: u64,
}

/// Health of the indexing database
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    /// Whether the index is synced to the node tip
    #[serde(default)]
    pub is_synced: bool,
    /// Blue score of the latest indexed block
    #[serde(default, with = "crate::json::lenient_u64")]
    pub blue_score: u64,
    /// Gap between node and index blue scores
    #[serde(default, with = "crate::json::lenient_u64")]
    pub blue_score_diff: u64,
}

/// Aggregate health of the service
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthState {
    /// Per-node status
    #[serde(default)]
    pub kaspad_servers: Option<Vec<KaspadServer>>,
    /// Indexing database status
    #[serde(default)]
    pub database: Option<DatabaseStatus>,
}

/// One fee bucket of a fee estimate
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBucket {
    /// Fee rate in sompi per gram
    #[serde(default, with = "crate::json::lenient_decimal")]
    pub feerate: Decimal,
    /// Estimated confirmation latency in seconds
    #[serde(default, with = "crate::json::lenient_decimal")]
    pub estimated_seconds: Decimal,
}

/// Fee estimate across priority tiers
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    /// Bucket for priority inclusion
    #[serde(default)]
    pub priority_bucket: Option<FeeBucket>,
    /// Buckets for normal inclusion
    #[serde(default)]
    pub normal_buckets: Option<Vec<FeeBucket>>,
    /// Buckets for low-priority inclusion
    #[serde(default)]
    pub low_buckets: Option<Vec<FeeBucket>>,
}

impl KaspaClient {
    /// Fetches network-wide chain statistics
    pub async fn network_info(&self, cancel: &CancellationToken) -> Result<NetworkInfo> {
        let response = self.pipeline().get("info/network", cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches the blue score of the virtual selected parent
    pub async fn blue_score(&self, cancel: &CancellationToken) -> Result<BlueScore> {
        let response = self
            .pipeline()
            .get("info/virtual-chain-blue-score", cancel)
            .await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches circulating and maximum coin supply
    pub async fn coin_supply(&self, cancel: &CancellationToken) -> Result<CoinSupply> {
        let response = self.pipeline().get("info/coinsupply", cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches the circulating supply as a bare number
    ///
    /// The endpoint answers with a plain text number rather than a JSON
    /// document, so the body is read raw and parsed here.
    pub async fn circulating_coins(
        &self,
        in_billion: bool,
        cancel: &CancellationToken,
    ) -> Result<Decimal> {
        let query = format!("info/coinsupply/circulating?in_billion={in_billion}");
        let response = self.pipeline().get(&query, cancel).await?;
        let text = self.pipeline().read_raw(response, cancel).await?;
        text.trim()
            .parse()
            .map_err(|_| Error::InvalidResponse(format!("not a numeric body: {text:?}")))
    }

    /// Fetches details of the next halving
    pub async fn halving(&self, cancel: &CancellationToken) -> Result<Halving> {
        let response = self.pipeline().get("info/halving", cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches the current network hashrate
    pub async fn hashrate(&self, cancel: &CancellationToken) -> Result<Hashrate> {
        let response = self.pipeline().get("info/hashrate", cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches the current block reward
    pub async fn block_reward(&self, cancel: &CancellationToken) -> Result<BlockReward> {
        let response = self.pipeline().get("info/blockreward", cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches the current token price
    pub async fn price(&self, cancel: &CancellationToken) -> Result<Price> {
        let response = self.pipeline().get("info/price", cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches status of the node backing the API
    pub async fn kaspad_info(&self, cancel: &CancellationToken) -> Result<KaspadInfo> {
        let response = self.pipeline().get("info/kaspad", cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches aggregate service health
    pub async fn health(&self, cancel: &CancellationToken) -> Result<HealthState> {
        let response = self.pipeline().get("info/health", cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches the current fee estimate
    pub async fn fee_estimate(&self, cancel: &CancellationToken) -> Result<FeeEstimate> {
        let response = self.pipeline().get("info/fee-estimate", cancel).await?;
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

    fn test_client(api_address: &str) -> KaspaClient {
        KaspaClient::new(ClientConfig {
            api_address: api_address.to_string(),
            ..ClientConfig::default()
        })
    }

    #[tokio::test]
    async fn test_coin_supply_decodes_string_amounts() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info/coinsupply"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"circulatingSupply": "2536198268000000", "maxSupply": "2861168156884127"}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let supply = client.coin_supply(&CancellationToken::new()).await.unwrap();

        assert_eq!(supply.circulating_supply, 2_536_198_268_000_000);
        assert_eq!(supply.max_supply, 2_861_168_156_884_127);
    }

    #[tokio::test]
    async fn test_circulating_coins_parses_bare_number() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info/coinsupply/circulating"))
            .and(query_param("in_billion", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_string("25361982.68"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let coins = client
            .circulating_coins(false, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(coins, "25361982.68".parse::<Decimal>().unwrap());
    }

    #[tokio::test]
    async fn test_circulating_coins_rejects_non_numeric_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info/coinsupply/circulating"))
            .respond_with(ResponseTemplate::new(200).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let err = client
            .circulating_coins(true, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_fee_estimate_buckets() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info/fee-estimate"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "priorityBucket": {"feerate": "1", "estimatedSeconds": 0.004},
                    "normalBuckets": [{"feerate": 1, "estimatedSeconds": "0.004"}],
                    "lowBuckets": []
                }"#,
            ))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let estimate = client
            .fee_estimate(&CancellationToken::new())
            .await
            .unwrap();

        let priority = estimate.priority_bucket.unwrap();
        assert_eq!(priority.feerate, Decimal::ONE);
        assert_eq!(estimate.normal_buckets.unwrap().len(), 1);
        assert!(estimate.low_buckets.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_state() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "kaspadServers": [{
                        "kaspadHost": "kaspad:16110",
                        "serverVersion": "0.14.1",
                        "isUtxoIndexed": true,
                        "isSynced": true,
                        "blueScore": "81540184"
                    }],
                    "database": {"isSynced": true, "blueScore": 81540180, "blueScoreDiff": 4}
                }"#,
            ))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let health = client.health(&CancellationToken::new()).await.unwrap();

        let servers = health.kaspad_servers.unwrap();
        assert_eq!(servers[0].blue_score, 81_540_184);
        assert_eq!(health.database.unwrap().blue_score_diff, 4);
    }

    #[tokio::test]
    async fn test_blue_score() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info/virtual-chain-blue-score"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"blueScore": "104505856"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let blue_score = client.blue_score(&CancellationToken::new()).await.unwrap();
        assert_eq!(blue_score.blue_score, 104_505_856);
    }
}
