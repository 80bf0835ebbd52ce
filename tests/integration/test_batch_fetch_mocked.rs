//! Integration tests for batched EFetch retrieval using mocked HTTP responses
//!
//! The EFetch mock answers with one minimal article per requested PMID, so
//! batch boundaries and ordering can be observed from the records and from the
//! recorded requests.

use pubmed_search_mcp::{BatchFetcher, ClientConfig, EutilsClient};
use tracing_test::traced_test;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Builds EFetch XML for whatever `id` list the request carries
///
/// A request whose id list contains `fail_on` gets a 500 instead.
struct EfetchResponder {
    fail_on: Option<&'static str>,
}

fn requested_ids(request: &Request) -> Vec<String> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

fn article_xml(pmid: &str) -> String {
    format!(
        r#"<PubmedArticle>
    <MedlineCitation>
        <PMID Version="1">{pmid}</PMID>
        <Article>
            <Journal><Title>Mock Journal</Title></Journal>
            <ArticleTitle>Article {pmid}</ArticleTitle>
        </Article>
    </MedlineCitation>
</PubmedArticle>"#
    )
}

impl Respond for EfetchResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let ids = requested_ids(request);
        if let Some(fail_on) = self.fail_on {
            if ids.iter().any(|id| id == fail_on) {
                return ResponseTemplate::new(500);
            }
        }

        let articles: String = ids.iter().map(|id| article_xml(id)).collect();
        ResponseTemplate::new(200)
            .set_body_string(format!(
                "<?xml version=\"1.0\" ?>\n<PubmedArticleSet>{}</PubmedArticleSet>",
                articles
            ))
            .insert_header("content-type", "application/xml")
    }
}

async fn setup_efetch_mock(fail_on: Option<&'static str>) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(EfetchResponder { fail_on })
        .mount(&mock_server)
        .await;

    mock_server
}

fn create_mock_fetcher(mock_server: &MockServer) -> BatchFetcher {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0); // High rate limit for tests

    BatchFetcher::new(EutilsClient::with_config(config).unwrap())
}

fn pmids(count: usize) -> Vec<String> {
    (0..count).map(|i| (10_000_000 + i).to_string()).collect()
}

#[tokio::test]
#[traced_test]
async fn test_empty_input_makes_no_requests() {
    let mock_server = setup_efetch_mock(None).await;
    let fetcher = create_mock_fetcher(&mock_server);

    let result = fetcher.fetch_all(&[]).await;

    assert!(result.records.is_empty());
    assert!(result.failures.is_empty());

    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        received_requests.len(),
        0,
        "No HTTP requests should be made for empty input"
    );
}

#[tokio::test]
#[traced_test]
async fn test_450_ids_fetched_in_three_ordered_batches() {
    let mock_server = setup_efetch_mock(None).await;
    let fetcher = create_mock_fetcher(&mock_server);
    let ids = pmids(450);

    let result = fetcher.fetch_all(&ids).await;

    assert!(result.failures.is_empty());
    assert_eq!(result.records.len(), 450);
    let returned: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
    let expected: Vec<&str> = ids.iter().map(String::as_str).collect();
    assert_eq!(returned, expected, "Records should keep input order");

    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 3, "450 ids should need exactly 3 requests");

    let batches: Vec<Vec<String>> = received_requests.iter().map(requested_ids).collect();
    assert_eq!(batches[0].len(), 200);
    assert_eq!(batches[1].len(), 200);
    assert_eq!(batches[2].len(), 50);
    assert_eq!(batches[0][0], ids[0]);
    assert_eq!(batches[1][0], ids[200]);
    assert_eq!(batches[2][0], ids[400]);
    assert_eq!(batches[2][49], ids[449]);
}

#[tokio::test]
#[traced_test]
async fn test_failed_middle_batch_is_reported_and_others_kept() {
    let ids = pmids(450);
    // First id of the second batch
    let mock_server = setup_efetch_mock(Some("10000200")).await;
    let fetcher = create_mock_fetcher(&mock_server);

    let result = fetcher.fetch_all(&ids).await;

    assert_eq!(result.records.len(), 250);
    assert_eq!(result.records[0].id, ids[0]);
    assert_eq!(result.records[199].id, ids[199]);
    assert_eq!(result.records[200].id, ids[400]);

    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.failed_id_count(), 200);
    let failure = &result.failures[0];
    assert_eq!(failure.ids, ids[200..400].to_vec());
    assert!(
        failure.message.contains("500"),
        "Failure should carry the HTTP status: {}",
        failure.message
    );

    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 3, "Later batches still run after a failure");
}

#[tokio::test]
#[traced_test]
async fn test_custom_batch_size() {
    let mock_server = setup_efetch_mock(None).await;
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0);
    let fetcher = BatchFetcher::with_batch_size(EutilsClient::with_config(config).unwrap(), 2);

    let result = fetcher.fetch_all(&pmids(5)).await;

    assert_eq!(result.records.len(), 5);
    let received_requests = mock_server.received_requests().await.unwrap();
    assert_eq!(received_requests.len(), 3);
}

#[tokio::test]
#[traced_test]
async fn test_malformed_batch_body_is_a_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<PubmedArticleSet><PubmedArticle>")
                .insert_header("content-type", "application/xml"),
        )
        .mount(&mock_server)
        .await;
    let fetcher = create_mock_fetcher(&mock_server);

    let result = fetcher.fetch_all(&pmids(3)).await;

    assert!(result.records.is_empty());
    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.failures[0].ids.len(), 3);
}
