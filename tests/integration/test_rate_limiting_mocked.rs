//! Rate limiting through the E-utilities client against a mock server

use std::time::{Duration, Instant};

use pubmed_search_mcp::{ClientConfig, Database, EutilsClient, RateLimiter};
use tracing_test::traced_test;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ESEARCH_ONE: &str = r#"{"esearchresult": {"count": "1", "idlist": ["35504917"]}}"#;

async fn setup_esearch_mock() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ESEARCH_ONE))
        .mount(&mock_server)
        .await;

    mock_server
}

#[tokio::test]
#[traced_test]
async fn test_sequential_requests_are_spaced() {
    let mock_server = setup_esearch_mock().await;
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(10.0);
    let client = EutilsClient::with_config(config).unwrap();

    let start = Instant::now();
    for _ in 0..4 {
        let (count, ids) = client.esearch(Database::PubMed, "CRISPR", 1).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(ids, vec!["35504917".to_string()]);
    }
    let elapsed = start.elapsed();

    // First grant is immediate, the next three wait 100ms each
    assert!(
        elapsed >= Duration::from_millis(290),
        "4 requests at 10/s finished too fast: {:?}",
        elapsed
    );
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
#[traced_test]
async fn test_concurrent_clones_share_one_limiter() {
    let mock_server = setup_esearch_mock().await;
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(20.0);
    let client = EutilsClient::with_config(config).unwrap();

    let start = Instant::now();
    let handles: Vec<_> = (0..5)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.esearch(Database::Pmc, "cancer", 1).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    let elapsed = start.elapsed();

    // Five grants at 50ms spacing span at least 200ms
    assert!(
        elapsed >= Duration::from_millis(190),
        "concurrent requests were not serialized: {:?}",
        elapsed
    );
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 5);
}

#[tokio::test]
#[traced_test]
async fn test_clients_with_shared_limiter() {
    let mock_server = setup_esearch_mock().await;
    let limiter = RateLimiter::new(Duration::from_millis(80));
    let config = ClientConfig::new().with_base_url(mock_server.uri());
    let first = EutilsClient::with_rate_limiter(config.clone(), limiter.clone()).unwrap();
    let second = EutilsClient::with_rate_limiter(config, limiter).unwrap();

    let start = Instant::now();
    first.esearch(Database::PubMed, "a", 1).await.unwrap();
    second.esearch(Database::PubMed, "b", 1).await.unwrap();
    first.esearch(Database::PubMed, "c", 1).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(150));
}

#[test]
fn test_default_intervals_follow_api_key() {
    let anonymous = EutilsClient::with_config(ClientConfig::new()).unwrap();
    assert_eq!(
        anonymous.rate_limiter().min_interval(),
        Duration::from_millis(340)
    );

    let keyed = EutilsClient::with_config(ClientConfig::new().with_api_key("key")).unwrap();
    assert_eq!(keyed.rate_limiter().min_interval(), Duration::from_millis(100));
}
