//! PMC (PubMed Central) document summaries
//!
//! PMC search results are resolved through ESummary rather than EFetch. The
//! summary JSON is keyed by dynamic UIDs, so it is read as a
//! `serde_json::Value` and every lookup is an optional accessor.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::models::{
    ArticleRecord, FALLBACK_ABSTRACT, FALLBACK_AUTHORS, FALLBACK_DATE, FALLBACK_ID,
    FALLBACK_JOURNAL, FALLBACK_TITLE,
};
use crate::pubmed::strip_doi_prefix;
use crate::responses::ESummaryResponse;

/// Parse a PMC ESummary response into records, in `uids` order
#[instrument(skip(json_text), fields(json_size = json_text.len()))]
pub fn parse_summaries(json_text: &str) -> Result<Vec<ArticleRecord>> {
    if json_text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let response: ESummaryResponse = serde_json::from_str(json_text)?;
    if let Some(error) = response.error.as_deref() {
        warn!(error = %error, "ESummary reported an error");
    }

    let result = &response.result;
    let uids: Vec<&str> = result
        .get("uids")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let records: Vec<ArticleRecord> = uids
        .iter()
        .filter_map(|uid| {
            let doc = result.get(*uid)?;
            if let Some(error) = doc.get("error").and_then(Value::as_str) {
                debug!(uid = %uid, error = %error, "Skipping summary with error");
                return None;
            }
            Some(normalize_summary(uid, doc))
        })
        .collect();

    Ok(records)
}

/// Normalize one ESummary document
///
/// Everything found in PMC has a full-text copy there, so the record is
/// flagged full text and open access regardless of the id list.
pub fn normalize_summary(uid: &str, doc: &Value) -> ArticleRecord {
    let id = article_id(doc, "pmid")
        .filter(|pmid| *pmid != "0")
        .unwrap_or(FALLBACK_ID)
        .to_string();

    let secondary_id = article_id(doc, "pmcid")
        .map(|pmcid| pmcid.trim_start_matches("pmc-id:").trim().to_string())
        .filter(|pmcid| !pmcid.is_empty())
        .unwrap_or_else(|| format!("PMC{}", uid.trim_start_matches("PMC")));

    let authors = doc
        .get("authors")
        .and_then(Value::as_array)
        .map(|authors| {
            authors
                .iter()
                .filter_map(|author| non_empty_str(author.get("name")))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| FALLBACK_AUTHORS.to_string());

    ArticleRecord {
        id,
        secondary_id,
        title: non_empty_str(doc.get("title"))
            .unwrap_or(FALLBACK_TITLE)
            .to_string(),
        authors_display: authors,
        journal_display: non_empty_str(doc.get("fulljournalname"))
            .or_else(|| non_empty_str(doc.get("source")))
            .unwrap_or(FALLBACK_JOURNAL)
            .to_string(),
        publication_date_display: non_empty_str(doc.get("pubdate"))
            .or_else(|| non_empty_str(doc.get("epubdate")))
            .unwrap_or(FALLBACK_DATE)
            .to_string(),
        external_ref_id: article_id(doc, "doi")
            .map(strip_doi_prefix)
            .unwrap_or_default()
            .to_string(),
        abstract_text: FALLBACK_ABSTRACT.to_string(),
        keywords: String::new(),
        mesh_terms: String::new(),
        has_full_text_copy: true,
        is_open_access: true,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn article_id<'a>(doc: &'a Value, id_type: &str) -> Option<&'a str> {
    doc.get("articleids")?
        .as_array()?
        .iter()
        .filter(|entry| {
            entry
                .get("idtype")
                .and_then(Value::as_str)
                .is_some_and(|t| t.eq_ignore_ascii_case(id_type))
        })
        .find_map(|entry| non_empty_str(entry.get("value")))
}
