//! Rate-limited access to the NCBI E-utilities endpoints

use std::fmt;

use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::rate_limit::RateLimiter;
use crate::responses::ESearchResult;

/// Entrez database targeted by a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Database {
    /// Bibliographic metadata, articles keyed by PMID
    PubMed,
    /// Open-access full-text repository
    Pmc,
}

impl Database {
    pub fn as_str(&self) -> &'static str {
        match self {
            Database::PubMed => "pubmed",
            Database::Pmc => "pmc",
        }
    }

    /// Upper bound for `max_results` on this database
    pub fn max_results_cap(&self) -> usize {
        match self {
            Database::PubMed => 500,
            Database::Pmc => 50,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Database::PubMed => "PubMed",
            Database::Pmc => "PMC",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client for the E-utilities REST API
///
/// Every request waits on the shared [`RateLimiter`] before it is sent.
/// Clones share the limiter, so one client built at startup caps the whole
/// process.
#[derive(Clone)]
pub struct EutilsClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl EutilsClient {
    /// Create a client with default configuration (no API key, 3 req/s)
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::new())
    }

    /// Create a client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_search_mcp::{ClientConfig, EutilsClient};
    ///
    /// let config = ClientConfig::new().with_email("researcher@university.edu");
    /// let client = EutilsClient::with_config(config).unwrap();
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let rate_limiter = config.create_rate_limiter();
        Self::with_rate_limiter(config, rate_limiter)
    }

    /// Create a client that shares an existing rate limiter
    pub fn with_rate_limiter(config: ClientConfig, rate_limiter: RateLimiter) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .map_err(|e| PubMedError::RequestFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.effective_base_url().to_string(),
            rate_limiter,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Issue one GET to `base_url/endpoint` and return the raw body
    ///
    /// The NCBI identification parameters (`api_key`, `email`, `tool`) are
    /// appended after `params`.
    ///
    /// # Errors
    ///
    /// * `PubMedError::Timeout` - the request exceeded the configured timeout
    /// * `PubMedError::ApiError` - the server answered with a non-2xx status
    /// * `PubMedError::RequestFailed` - any other transport failure
    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    pub async fn request(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
        let url = self.build_url(endpoint, params);

        self.rate_limiter.acquire().await;
        debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("API request failed with status: {}", status);
            return Err(PubMedError::ApiError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        Ok(response.text().await?)
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> String {
        let api_params = self.config.build_api_params();
        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .chain(
                api_params
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value))),
            )
            .collect();

        let mut url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    /// Run an ESearch query, returning the total hit count and the first
    /// `retmax` ids in relevance order
    #[instrument(skip(self), fields(db = %db, retmax = retmax))]
    pub async fn esearch(
        &self,
        db: Database,
        term: &str,
        retmax: usize,
    ) -> Result<(usize, Vec<String>)> {
        let retmax = retmax.to_string();
        let body = self
            .request(
                "esearch.fcgi",
                &[
                    ("db", db.as_str()),
                    ("term", term),
                    ("retmax", &retmax),
                    ("retmode", "json"),
                ],
            )
            .await?;

        let data = serde_json::from_str::<ESearchResult>(&body)?.esearchresult;

        // NCBI sometimes returns 200 OK with an ERROR field
        if let Some(error_msg) = data.error.as_deref() {
            return Err(PubMedError::ApiError {
                status: 200,
                message: format!("NCBI ESearch API error: {}", error_msg),
            });
        }

        Ok((data.total_count(), data.idlist))
    }

    /// Fetch full PubMed records for a batch of PMIDs as EFetch XML
    #[instrument(skip(self, ids), fields(ids_count = ids.len()))]
    pub async fn efetch_xml(&self, ids: &[String]) -> Result<String> {
        let id_list = ids.join(",");
        self.request(
            "efetch.fcgi",
            &[
                ("db", Database::PubMed.as_str()),
                ("id", &id_list),
                ("retmode", "xml"),
                ("rettype", "abstract"),
            ],
        )
        .await
    }

    /// Fetch document summaries as ESummary JSON
    #[instrument(skip(self, ids), fields(db = %db, ids_count = ids.len()))]
    pub async fn esummary_json(&self, db: Database, ids: &[String]) -> Result<String> {
        let id_list = ids.join(",");
        self.request(
            "esummary.fcgi",
            &[("db", db.as_str()), ("id", &id_list), ("retmode", "json")],
        )
        .await
    }
}
