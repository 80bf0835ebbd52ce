//! Query search and fetch-by-id on top of the batch pipeline

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::batch::BatchFetcher;
use crate::client::{Database, EutilsClient};
use crate::error::{PubMedError, Result};
use crate::models::{ArticleRecord, SearchOutcome};
use crate::pmc::parse_summaries;

/// Result count used when the caller gives none or something non-numeric
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Resolve a loosely typed `max_results` argument for `database`
///
/// Numbers and numeric strings are clamped to `[1, database cap]`; anything
/// else, including a missing value, yields [`DEFAULT_MAX_RESULTS`].
///
/// ```
/// use pubmed_search_mcp::{Database, search::resolve_max_results};
/// use serde_json::json;
///
/// assert_eq!(resolve_max_results(Some(&json!(-7)), Database::PubMed), 1);
/// assert_eq!(resolve_max_results(Some(&json!("abc")), Database::PubMed), 10);
/// assert_eq!(resolve_max_results(Some(&json!(900)), Database::Pmc), 50);
/// ```
pub fn resolve_max_results(value: Option<&Value>, database: Database) -> usize {
    let requested = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    };

    match requested {
        Some(n) => n.clamp(1, database.max_results_cap() as i64) as usize,
        None => DEFAULT_MAX_RESULTS,
    }
}

/// Validate a PMID given as a JSON number or string
///
/// Surrounding quotes are unwrapped, so `"\"35504917\""` is accepted.
pub fn parse_article_id(value: &Value) -> Result<String> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(id) => Ok(id.to_string()),
            None => Err(PubMedError::InvalidPmid {
                pmid: n.to_string(),
            }),
        },
        Value::String(s) => validate_pmid(s),
        other => Err(PubMedError::InvalidPmid {
            pmid: other.to_string(),
        }),
    }
}

/// Check that `raw` is a numeric PMID once whitespace and quotes are removed
pub fn validate_pmid(raw: &str) -> Result<String> {
    static PMID_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = PMID_REGEX.get_or_init(|| Regex::new(r"^\d+$").expect("PMID regex is valid"));

    let unwrapped = raw
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'')
        .trim();

    if re.is_match(unwrapped) {
        Ok(unwrapped.to_string())
    } else {
        Err(PubMedError::InvalidPmid {
            pmid: raw.to_string(),
        })
    }
}

/// Composes ESearch with batch fetching and normalization
#[derive(Clone)]
pub struct SearchOrchestrator {
    client: EutilsClient,
    fetcher: BatchFetcher,
}

impl SearchOrchestrator {
    pub fn new(client: EutilsClient) -> Self {
        let fetcher = BatchFetcher::new(client.clone());
        Self { client, fetcher }
    }

    /// Use a custom fetcher (e.g. a different batch size) sharing `client`
    pub fn with_fetcher(client: EutilsClient, fetcher: BatchFetcher) -> Self {
        Self { client, fetcher }
    }

    pub fn client(&self) -> &EutilsClient {
        &self.client
    }

    /// Search `database` and resolve the matching ids into records
    ///
    /// PubMed ids go through the batch fetcher; PMC ids are resolved with a
    /// single ESummary call since PMC has no abstract-level EFetch.
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidQuery` - the trimmed query is empty (no request is made)
    /// * any remote error from the ESearch call or the PMC summary call
    #[instrument(skip(self), fields(db = %database))]
    pub async fn search_by_query(
        &self,
        database: Database,
        query: &str,
        max_results: usize,
    ) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PubMedError::InvalidQuery(
                "search query must not be empty".to_string(),
            ));
        }

        let max_results = max_results.clamp(1, database.max_results_cap());
        let (total_count, mut ids) = self.client.esearch(database, query, max_results).await?;
        ids.truncate(max_results);

        if ids.is_empty() {
            info!(total_count, "Search returned no ids");
            return Ok(SearchOutcome {
                total_count,
                records: Vec::new(),
                failure_count: 0,
            });
        }

        let (records, failure_count) = match database {
            Database::PubMed => {
                let fetched = self.fetcher.fetch_all(&ids).await;
                let failures = fetched.failure_count();
                (fetched.records, failures)
            }
            Database::Pmc => {
                let json = self.client.esummary_json(database, &ids).await?;
                (parse_summaries(&json)?, 0)
            }
        };

        info!(
            total_count,
            requested = ids.len(),
            returned = records.len(),
            failure_count,
            "Search completed"
        );

        Ok(SearchOutcome {
            total_count,
            records,
            failure_count,
        })
    }

    /// Fetch one PubMed article, `None` when PubMed has no such record
    ///
    /// A failed fetch is logged and also reported as `None`, the same way a
    /// search whose batches all failed reports no results.
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidPmid` - `id` is not numeric (no request is made)
    #[instrument(skip(self), fields(pmid = %id))]
    pub async fn fetch_by_id(&self, id: &str) -> Result<Option<ArticleRecord>> {
        let id = validate_pmid(id)?;
        let mut fetched = self.fetcher.fetch_all(std::slice::from_ref(&id)).await;

        if fetched.records.is_empty() {
            if let Some(failure) = fetched.failures.first() {
                warn!(error = %failure.message, "Fetch by id failed, reporting not found");
            }
            return Ok(None);
        }

        let index = fetched
            .records
            .iter()
            .position(|record| record.id == id)
            .unwrap_or_else(|| {
                warn!("Fetched record id does not match request, using first record");
                0
            });

        Ok(Some(fetched.records.swap_remove(index)))
    }
}
