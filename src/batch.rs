//! Best-effort bulk retrieval of PubMed records

use tracing::{debug, info, instrument, warn};

use crate::client::EutilsClient;
use crate::error::Result;
use crate::models::{ArticleRecord, BatchFailure, BatchFetchResult};
use crate::pubmed::parse_articles_from_xml;

/// NCBI recommends batches of up to 200 IDs per EFetch request
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Fetches PMIDs in fixed-size batches, one EFetch call per batch
///
/// Batches run strictly one after another in input order. A batch whose
/// request or parse fails is recorded in [`BatchFetchResult::failures`] and the
/// remaining batches still run.
#[derive(Clone)]
pub struct BatchFetcher {
    client: EutilsClient,
    batch_size: usize,
}

impl BatchFetcher {
    pub fn new(client: EutilsClient) -> Self {
        Self::with_batch_size(client, DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(client: EutilsClient, batch_size: usize) -> Self {
        Self {
            client,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Fetch and normalize every id, never failing as a whole
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_search_mcp::{BatchFetcher, EutilsClient};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let fetcher = BatchFetcher::new(EutilsClient::new()?);
    ///     let ids = vec!["31978945".to_string(), "33515491".to_string()];
    ///     let result = fetcher.fetch_all(&ids).await;
    ///     println!("{} records, {} failed batches", result.records.len(), result.failure_count());
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, ids), fields(ids_count = ids.len(), batch_size = self.batch_size))]
    pub async fn fetch_all(&self, ids: &[String]) -> BatchFetchResult {
        let mut result = BatchFetchResult::default();

        if ids.is_empty() {
            return result;
        }

        for (index, chunk) in ids.chunks(self.batch_size).enumerate() {
            debug!(batch = index, batch_size = chunk.len(), "Fetching batch");

            match self.fetch_batch(chunk).await {
                Ok(records) => {
                    info!(
                        batch = index,
                        requested = chunk.len(),
                        parsed = records.len(),
                        "Batch fetch completed"
                    );
                    result.records.extend(records);
                }
                Err(e) => {
                    warn!(batch = index, ids = chunk.len(), error = %e, "Batch fetch failed, continuing");
                    result.failures.push(BatchFailure {
                        ids: chunk.to_vec(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if result.failure_count() > 0 {
            warn!(
                failed_batches = result.failure_count(),
                failed_ids = result.failed_id_count(),
                "Some batches could not be fetched"
            );
        }

        result
    }

    async fn fetch_batch(&self, ids: &[String]) -> Result<Vec<ArticleRecord>> {
        let xml = self.client.efetch_xml(ids).await?;
        parse_articles_from_xml(&xml)
    }
}
