//! # PubMed Search MCP
//!
//! Rate-limited PubMed and PMC literature search, exposed as MCP tools.
//!
//! The library holds the fetch pipeline: a process-wide [`RateLimiter`] in front
//! of every NCBI E-utilities call, a [`BatchFetcher`] that retrieves PMIDs in
//! batches of 200 and keeps going when a batch fails, normalizers that reduce
//! EFetch XML and PMC ESummary JSON into flat [`ArticleRecord`]s, and a
//! [`SearchOrchestrator`] tying search and fetch together. The binary wraps
//! [`tools`] in an rmcp server on standard streams.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_search_mcp::{Database, EutilsClient, SearchOrchestrator, format};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = SearchOrchestrator::new(EutilsClient::new()?);
//!
//!     let outcome = orchestrator
//!         .search_by_query(Database::PubMed, "CRISPR[Title]", 5)
//!         .await?;
//!
//!     let header = format!("Found {} results", outcome.total_count);
//!     println!("{}", format::render_article_list(&outcome.records, &header));
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod pmc;
pub mod pubmed;
pub mod rate_limit;
mod responses;
pub mod search;
pub mod tools;

// Re-export main types for convenience
pub use batch::BatchFetcher;
pub use client::{Database, EutilsClient};
pub use config::ClientConfig;
pub use error::{PubMedError, Result};
pub use models::{ArticleRecord, BatchFailure, BatchFetchResult, SearchOutcome};
pub use rate_limit::RateLimiter;
pub use search::SearchOrchestrator;
