//! Address endpoints — balances, UTXOs, transaction counts, and the
//! paginated full-transaction retrieval.

use crate::error::Result;
use crate::paging::{PageDirection, PageWalk, fetch_all_pages};
use crate::types::{FullTransaction, Outpoint, ResolvePreviousOutpoints, UtxoEntry};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::form_urlencoded;

use super::KaspaClient;

/// Balance of a single address
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBalance {
    /// The queried address
    #[serde(default)]
    pub address: Option<String>,
    /// Balance in sompi
    #[serde(default, with = "crate::json::lenient_u64")]
    pub balance: u64,
}

/// One UTXO held by an address
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressUtxo {
    /// Owning address
    #[serde(default)]
    pub address: Option<String>,
    /// Outpoint identifying the unspent output
    #[serde(default)]
    pub outpoint: Outpoint,
    /// The unspent output itself
    #[serde(default)]
    pub utxo_entry: UtxoEntry,
}

/// Number of transactions known for an address
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsCount {
    /// Total transaction count
    #[serde(default, with = "crate::json::lenient_u64")]
    pub total: u64,
    /// True when the service stopped counting at its internal limit
    #[serde(default)]
    pub limit_exceeded: bool,
}

#[derive(Serialize)]
struct BalancesRequest {
    addresses: Vec<String>,
}

/// Parameters of a paginated full-transaction retrieval
///
/// Defaults mirror the service: 50 records per page, walking backward from
/// the beginning of time (`timestamp` 0 is the endpoint's neutral seed),
/// previous outpoints unresolved.
#[derive(Clone, Debug)]
pub struct FullTransactionsPageRequest {
    /// Address to fetch transactions for
    pub address: String,
    /// Records per page (service accepts 1–500)
    pub limit: u32,
    /// Boundary seed in epoch milliseconds
    pub timestamp: u64,
    /// Whether to walk before or after the seed
    pub direction: PageDirection,
    /// Comma-separated field projection; empty requests every field
    pub fields: String,
    /// Previous-outpoint resolution level
    pub resolve_previous_outpoints: ResolvePreviousOutpoints,
}

impl FullTransactionsPageRequest {
    /// Creates a request with service defaults for the given address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            limit: 50,
            timestamp: 0,
            direction: PageDirection::Before,
            fields: String::new(),
            resolve_previous_outpoints: ResolvePreviousOutpoints::No,
        }
    }
}

impl KaspaClient {
    /// Fetches the balance of one address
    pub async fn balance(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<AddressBalance> {
        let query = format!("addresses/{}/balance", urlencoding::encode(address));
        let response = self.pipeline().get(&query, cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches balances for several addresses in one call
    pub async fn balances(
        &self,
        addresses: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<AddressBalance>> {
        let body = BalancesRequest {
            addresses: addresses.to_vec(),
        };
        let response = self
            .pipeline()
            .post("addresses/balances", &body, cancel)
            .await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches the unspent outputs of an address
    pub async fn utxos(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<AddressUtxo>> {
        let query = format!("addresses/{}/utxos", urlencoding::encode(address));
        let response = self.pipeline().get(&query, cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Fetches the number of transactions known for an address
    pub async fn transactions_count(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<TransactionsCount> {
        let query = format!(
            "addresses/{}/transactions-count",
            urlencoding::encode(address)
        );
        let response = self.pipeline().get(&query, cancel).await?;
        self.pipeline().read_json(response, cancel).await
    }

    /// Retrieves every transaction of an address through the paginated
    /// endpoint
    ///
    /// Follows the direction-specific continuation header page by page,
    /// pacing requests with the configured page delay, and returns the full
    /// set sorted chronologically by `block_time`. Any page failure or a
    /// cancellation aborts the whole retrieval without partial results.
    pub async fn full_transactions_page(
        &self,
        request: FullTransactionsPageRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<FullTransaction>> {
        let FullTransactionsPageRequest {
            address,
            limit,
            timestamp,
            direction,
            fields,
            resolve_previous_outpoints,
        } = request;

        tracing::debug!(%address, ?direction, seed = timestamp, "starting paginated retrieval");

        let encoded = urlencoding::encode(&address).into_owned();
        let walk = PageWalk {
            direction,
            seed: timestamp.to_string(),
            page_delay: self.config().page_delay,
            build_query: move |cursor: &str| {
                let mut params = form_urlencoded::Serializer::new(String::new());
                params.append_pair("limit", &limit.to_string());
                params.append_pair(direction.query_param(), cursor);
                params.append_pair(
                    "resolve_previous_outpoints",
                    resolve_previous_outpoints.as_str(),
                );
                if !fields.is_empty() {
                    params.append_pair("fields", &fields);
                }
                format!(
                    "addresses/{encoded}/full-transactions-page?{}",
                    params.finish()
                )
            },
        };

        fetch_all_pages(
            self.pipeline(),
            walk,
            |tx: &FullTransaction| tx.block_time,
            cancel,
        )
        .await
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_ADDRESS: &str =
        "kaspa:qqkqkzjvr7zwxxmjxjkmxxdwju9kjs6e9u82uh59z07vgaks6gg62v8707g73";

    fn test_client(api_address: &str) -> KaspaClient {
        KaspaClient::new(ClientConfig {
            api_address: api_address.to_string(),
            page_delay: Duration::from_millis(10),
            ..ClientConfig::default()
        })
    }

    #[tokio::test]
    async fn test_balance_decodes_string_amount() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/addresses/{TEST_ADDRESS}/balance")))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"{{"address": "{TEST_ADDRESS}", "balance": "123456789"}}"#
            )))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let balance = client
            .balance(TEST_ADDRESS, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(balance.balance, 123_456_789);
        assert_eq!(balance.address.as_deref(), Some(TEST_ADDRESS));
    }

    #[tokio::test]
    async fn test_balances_posts_address_list() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/addresses/balances"))
            .and(body_json(
                serde_json::json!({"addresses": [TEST_ADDRESS]}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"[{{"address": "{TEST_ADDRESS}", "balance": 5}}]"#
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let balances = client
            .balances(&[TEST_ADDRESS.to_string()], &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].balance, 5);
    }

    #[tokio::test]
    async fn test_transactions_count() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!(
                "/addresses/{TEST_ADDRESS}/transactions-count"
            )))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"total": "812", "limitExceeded": false}"#),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let count = client
            .transactions_count(TEST_ADDRESS, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(count.total, 812);
        assert!(!count.limit_exceeded);
    }

    #[tokio::test]
    async fn test_full_transactions_page_walks_and_sorts() {
        // Two pages chained via X-Next-Page-After; the result must be the
        // union of both pages sorted by block_time.
        let mock_server = MockServer::start().await;
        let page_path = format!("/addresses/{TEST_ADDRESS}/full-transactions-page");

        Mock::given(method("GET"))
            .and(path(page_path.clone()))
            .and(query_param("after", "0"))
            .and(query_param("limit", "50"))
            .and(query_param("resolve_previous_outpoints", "no"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Next-Page-After", "1700000000300")
                    .set_body_string(
                        r#"[{"transaction_id": "b", "block_time": 1700000000200},
                            {"transaction_id": "a", "block_time": 1700000000100}]"#,
                    ),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(page_path))
            .and(query_param("after", "1700000000300"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"transaction_id": "c", "block_time": 1700000000300}]"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let mut request = FullTransactionsPageRequest::new(TEST_ADDRESS);
        request.direction = PageDirection::After;

        let transactions = client
            .full_transactions_page(request, &CancellationToken::new())
            .await
            .unwrap();

        let ids: Vec<&str> = transactions
            .iter()
            .filter_map(|tx| tx.transaction_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_full_transactions_page_includes_projection() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("fields", "transaction_id,block_time"))
            .and(query_param("before", "1700000000000"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let mut request = FullTransactionsPageRequest::new(TEST_ADDRESS);
        request.timestamp = 1_700_000_000_000;
        request.fields = "transaction_id,block_time".to_string();

        let transactions = client
            .full_transactions_page(request, &CancellationToken::new())
            .await
            .unwrap();
        assert!(transactions.is_empty());
    }
}
