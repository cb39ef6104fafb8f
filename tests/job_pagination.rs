//! End-to-end tests of the "as job" path: a paginated retrieval wrapped in a
//! background job, driven against a mock API server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use kaspa_rest_client::client::FullTransactionsPageRequest;
use kaspa_rest_client::job::{Job, JobRecord, JobState};
use kaspa_rest_client::{ClientConfig, KaspaClient, PageDirection};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_ADDRESS: &str = "kaspa:qqkqkzjvr7zwxxmjxjkmxxdwju9kjs6e9u82uh59z07vgaks6gg62v8707g73";

fn test_client(api_address: &str, page_delay: Duration) -> KaspaClient {
    KaspaClient::new(ClientConfig {
        api_address: api_address.to_string(),
        page_delay,
        ..ClientConfig::default()
    })
}

fn page_request() -> FullTransactionsPageRequest {
    let mut request = FullTransactionsPageRequest::new(TEST_ADDRESS);
    request.direction = PageDirection::After;
    request
}

#[tokio::test]
async fn test_job_wrapped_traversal_completes_with_sorted_output() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/addresses/.+/full-transactions-page$"))
        .and(query_param("after", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Next-Page-After", "200")
                .set_body_string(
                    r#"[{"transaction_id": "t2", "block_time": 200},
                        {"transaction_id": "t1", "block_time": 100}]"#,
                ),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/addresses/.+/full-transactions-page$"))
        .and(query_param("after", "200"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"transaction_id": "t3", "block_time": 300}]"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Duration::from_millis(10));
    let request = page_request();

    let job = Arc::new(Job::new("full-transactions", move |cancel| async move {
        client.full_transactions_page(request, &cancel).await
    }));
    let mut records = job.take_records().unwrap();

    let handle = job.spawn(CancellationToken::new());
    handle.await.unwrap();

    assert_eq!(job.state(), JobState::Completed);
    assert!(!job.has_more_data());

    match records.recv().await {
        Some(JobRecord::Output(transactions)) => {
            let ids: Vec<&str> = transactions
                .iter()
                .filter_map(|tx| tx.transaction_id.as_deref())
                .collect();
            assert_eq!(ids, vec!["t1", "t2", "t3"]);
        }
        other => panic!("expected output record, got {other:?}"),
    }
    assert!(records.recv().await.is_none());
}

#[tokio::test]
async fn test_stopping_job_aborts_traversal_without_partial_output() {
    // Every page advertises a fresh cursor, so the traversal would run
    // forever; stopping the job must end it in Stopped with no output.
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/addresses/.+/full-transactions-page$"))
        .respond_with(|request: &wiremock::Request| {
            let after: u64 = request
                .url
                .query_pairs()
                .find(|(key, _)| key == "after")
                .and_then(|(_, value)| value.parse().ok())
                .unwrap_or(0);
            ResponseTemplate::new(200)
                .insert_header("X-Next-Page-After", (after + 100).to_string().as_str())
                .set_body_string(format!(r#"[{{"block_time": {after}}}]"#))
        })
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Duration::from_millis(50));
    let request = page_request();

    let job = Arc::new(Job::new("full-transactions", move |cancel| async move {
        client.full_transactions_page(request, &cancel).await
    }));
    let mut records = job.take_records().unwrap();

    let handle = job.spawn(CancellationToken::new());
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(job.state(), JobState::Running);

    job.stop();
    handle.await.unwrap();

    assert_eq!(job.state(), JobState::Stopped);
    assert!(!job.has_more_data());

    // Only a cancellation notice, never a partial result set
    match records.recv().await {
        Some(JobRecord::Notice(_)) => {}
        other => panic!("expected cancellation notice, got {other:?}"),
    }
    assert!(records.recv().await.is_none());
}

#[tokio::test]
async fn test_failed_page_surfaces_as_failed_job() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/addresses/.+/full-transactions-page$"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri(), Duration::from_millis(10));
    let request = page_request();

    let job = Arc::new(Job::new("full-transactions", move |cancel| async move {
        client.full_transactions_page(request, &cancel).await
    }));
    let mut records = job.take_records().unwrap();

    job.run(CancellationToken::new()).await;

    assert_eq!(job.state(), JobState::Failed);
    assert!(job.status_message().contains("500"));
    assert!(matches!(records.recv().await, Some(JobRecord::Error(_))));
}
