//! Tool operations exposed over MCP, independent of the protocol crate
//!
//! Each operation validates its input before any remote call and turns remote
//! failures into a text reply, so a tool call never fails at the protocol
//! level because NCBI misbehaved.

use serde_json::Value;
use tracing::{info, warn};

use crate::client::Database;
use crate::format::{render_article, render_article_list};
use crate::search::{SearchOrchestrator, parse_article_id, resolve_max_results};

/// Outcome of a tool operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolReply {
    /// Results, "no results", or a remote error rendered as text
    Text(String),
    /// Input rejected before contacting NCBI
    InvalidInput(String),
}

impl ToolReply {
    pub fn text(&self) -> &str {
        match self {
            ToolReply::Text(text) | ToolReply::InvalidInput(text) => text,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ToolReply::InvalidInput(_))
    }
}

/// Search PubMed or PMC and render the hits
pub async fn search(
    orchestrator: &SearchOrchestrator,
    database: Database,
    query: &str,
    max_results: Option<&Value>,
) -> ToolReply {
    let query = query.trim();
    if query.is_empty() {
        return ToolReply::InvalidInput(
            "Error: a non-empty search query is required.".to_string(),
        );
    }

    let max_results = resolve_max_results(max_results, database);
    info!(query = %query, max_results, db = %database, "Running search tool");

    let outcome = match orchestrator
        .search_by_query(database, query, max_results)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) if e.is_invalid_input() => return ToolReply::InvalidInput(format!("Error: {}", e)),
        Err(e) => {
            warn!(error = %e, "Search failed");
            return ToolReply::Text(format!(
                "Error searching {}: {}",
                database.display_name(),
                e
            ));
        }
    };

    let failure_note = if outcome.failure_count > 0 {
        format!(
            "Note: {} batch(es) of results could not be retrieved.\n",
            outcome.failure_count
        )
    } else {
        String::new()
    };

    if outcome.records.is_empty() {
        return ToolReply::Text(format!(
            "{}No results found in {} for \"{}\".",
            failure_note,
            database.display_name(),
            query
        ));
    }

    let mut header = format!(
        "Found {} results in {} for \"{}\"",
        outcome.total_count,
        database.display_name(),
        query
    );
    if database == Database::Pmc {
        header.push_str(" (all PMC results are open access)");
    }
    if !failure_note.is_empty() {
        header.push('\n');
        header.push_str(failure_note.trim_end());
    }

    ToolReply::Text(render_article_list(&outcome.records, &header))
}

/// Fetch one article by PMID and render it
pub async fn fetch_article(orchestrator: &SearchOrchestrator, id: &Value) -> ToolReply {
    let pmid = match parse_article_id(id) {
        Ok(pmid) => pmid,
        Err(e) => {
            return ToolReply::InvalidInput(format!(
                "Error: {}. A PMID must be numeric, e.g. 35504917.",
                e
            ));
        }
    };

    match orchestrator.fetch_by_id(&pmid).await {
        Ok(Some(record)) => ToolReply::Text(render_article(&record)),
        Ok(None) => ToolReply::Text(format!("No article found for PMID {}.", pmid)),
        Err(e) if e.is_invalid_input() => ToolReply::InvalidInput(format!("Error: {}", e)),
        Err(e) => {
            warn!(pmid = %pmid, error = %e, "Fetch failed");
            ToolReply::Text(format!("Error fetching PMID {}: {}", pmid, e))
        }
    }
}

/// Static usage text
pub fn help_text() -> String {
    format!(
        "PubMed Search MCP Server v{version}

Tools:
  search_pubmed   Search PubMed article metadata.
                  query (required), max_results (optional, default 10, 1-500)
  fetch_article   Fetch one article with its abstract by PMID.
                  pmid (required, numeric, e.g. 35504917)
  search_pmc      Search PubMed Central open-access full text.
                  query (required), max_results (optional, default 10, 1-50)
  help            Show this message.

Query syntax follows PubMed, e.g. CRISPR[Title] AND 2023[PDAT].
Requests are rate limited to NCBI's allowance (3/s, 10/s with an API key).",
        version = env!("CARGO_PKG_VERSION")
    )
}
