//! Canonical records produced by the fetch pipeline

use serde::{Deserialize, Serialize};

pub const FALLBACK_ID: &str = "unavailable";
pub const FALLBACK_TITLE: &str = "No title available";
pub const FALLBACK_AUTHORS: &str = "No authors listed";
pub const FALLBACK_JOURNAL: &str = "Unknown journal";
pub const FALLBACK_DATE: &str = "Unknown date";
pub const FALLBACK_ABSTRACT: &str = "No abstract available";

/// Flat, display-ready article record
///
/// Every field is resolved: missing upstream data is replaced by one of the
/// `FALLBACK_*` literals or by an empty string for the optional identifiers
/// and term lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// PubMed ID
    pub id: String,
    /// PMC ID, empty if the article has no PMC copy
    pub secondary_id: String,
    pub title: String,
    pub authors_display: String,
    pub journal_display: String,
    pub publication_date_display: String,
    /// DOI without any scheme prefix, empty if unknown
    pub external_ref_id: String,
    /// Full abstract; truncation is left to the presenter
    pub abstract_text: String,
    pub keywords: String,
    pub mesh_terms: String,
    pub has_full_text_copy: bool,
    /// Loose definition: any article with a PMC copy counts as open access
    pub is_open_access: bool,
}

/// One batch that could not be fetched or parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub ids: Vec<String>,
    pub message: String,
}

/// Result of a best-effort bulk fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchFetchResult {
    /// Records from successful batches, in batch order
    pub records: Vec<ArticleRecord>,
    pub failures: Vec<BatchFailure>,
}

impl BatchFetchResult {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of requested ids that ended up in a failed batch
    pub fn failed_id_count(&self) -> usize {
        self.failures.iter().map(|f| f.ids.len()).sum()
    }
}

/// Answer to a query search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Total hits reported by ESearch, not just the fetched page
    pub total_count: usize,
    pub records: Vec<ArticleRecord>,
    pub failure_count: usize,
}
