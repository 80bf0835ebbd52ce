//! Input validation for the tool operations
//!
//! Each case checks both the reply and what reached the mock server: rejected
//! input must never produce a request.

use pubmed_search_mcp::tools::{self, ToolReply};
use pubmed_search_mcp::{ClientConfig, Database, EutilsClient, SearchOrchestrator};
use rstest::rstest;
use serde_json::{Value, json};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ESEARCH_EMPTY: &str = r#"{"esearchresult": {"count": "0", "retmax": "0", "idlist": []}}"#;

async fn setup_esearch_mock() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ESEARCH_EMPTY))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<PubmedArticleSet></PubmedArticleSet>"),
        )
        .mount(&mock_server)
        .await;

    mock_server
}

fn create_mock_orchestrator(mock_server: &MockServer) -> SearchOrchestrator {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0); // High rate limit for tests

    SearchOrchestrator::new(EutilsClient::with_config(config).unwrap())
}

async fn retmax_sent(mock_server: &MockServer) -> String {
    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 1);
    received_requests[0]
        .url
        .query_pairs()
        .find(|(key, _)| key == "retmax")
        .map(|(_, value)| value.into_owned())
        .unwrap()
}

#[rstest]
#[case::negative(Some(json!(-7)), "1")]
#[case::non_numeric(Some(json!("abc")), "10")]
#[case::missing(None, "10")]
#[case::numeric_string(Some(json!("25")), "25")]
#[case::above_cap(Some(json!(10_000)), "500")]
#[tokio::test]
async fn test_max_results_resolution(#[case] max_results: Option<Value>, #[case] expected: &str) {
    let mock_server = setup_esearch_mock().await;
    let orchestrator = create_mock_orchestrator(&mock_server);

    let reply = tools::search(
        &orchestrator,
        Database::PubMed,
        "CRISPR",
        max_results.as_ref(),
    )
    .await;

    assert!(!reply.is_invalid_input());
    assert_eq!(retmax_sent(&mock_server).await, expected);
}

#[rstest]
#[case::empty("")]
#[case::whitespace("   \t ")]
#[tokio::test]
async fn test_empty_query_rejected_without_request(#[case] query: &str) {
    let mock_server = setup_esearch_mock().await;
    let orchestrator = create_mock_orchestrator(&mock_server);

    for database in [Database::PubMed, Database::Pmc] {
        let reply = tools::search(&orchestrator, database, query, None).await;
        assert!(reply.is_invalid_input(), "{database} should reject {query:?}");
    }

    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 0);
}

#[rstest]
#[case::letters(json!("abc"))]
#[case::mixed(json!("1234abc"))]
#[case::empty(json!(""))]
#[case::negative(json!(-1))]
#[case::null(Value::Null)]
#[tokio::test]
async fn test_invalid_pmid_rejected_without_request(#[case] pmid: Value) {
    let mock_server = setup_esearch_mock().await;
    let orchestrator = create_mock_orchestrator(&mock_server);

    let reply = tools::fetch_article(&orchestrator, &pmid).await;

    assert!(reply.is_invalid_input());
    assert!(reply.text().contains("PMID must be numeric"));
    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 0);
}

#[rstest]
#[case::quoted(json!("\"35504917\""))]
#[case::plain(json!("35504917"))]
#[case::number(json!(35504917))]
#[tokio::test]
async fn test_valid_pmid_forms_reach_efetch(#[case] pmid: Value) {
    let mock_server = setup_esearch_mock().await;
    let orchestrator = create_mock_orchestrator(&mock_server);

    let reply = tools::fetch_article(&orchestrator, &pmid).await;

    assert_eq!(
        reply,
        ToolReply::Text("No article found for PMID 35504917.".to_string())
    );
    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 1);
    let id = received_requests[0]
        .url
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned());
    assert_eq!(id.as_deref(), Some("35504917"));
}

#[test]
fn test_help_text_mentions_every_tool() {
    let help = tools::help_text();
    assert!(help.contains(env!("CARGO_PKG_VERSION")));
    for tool in ["search_pubmed", "fetch_article", "search_pmc"] {
        assert!(help.contains(tool));
    }
}
