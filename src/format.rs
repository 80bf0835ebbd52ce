//! Plain-text rendering of article records for tool output

use crate::models::{ArticleRecord, FALLBACK_ID};

/// Abstracts longer than this many characters are cut at render time
pub const ABSTRACT_PREVIEW_CHARS: usize = 800;

const ELLIPSIS: &str = "...";
const ENTRY_SEPARATOR: &str = "\n---\n\n";

/// Permanent PubMed URL for a PMID
pub fn permalink(id: &str) -> String {
    format!("https://pubmed.ncbi.nlm.nih.gov/{}/", id)
}

/// PubMed link when the record has a PMID, else its PMC article page
pub fn article_url(record: &ArticleRecord) -> Option<String> {
    if record.id != FALLBACK_ID {
        Some(permalink(&record.id))
    } else if !record.secondary_id.is_empty() {
        Some(format!(
            "https://pmc.ncbi.nlm.nih.gov/articles/{}/",
            record.secondary_id
        ))
    } else {
        None
    }
}

/// Cut `text` to `max_chars` characters, marking the cut with `...`
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Render one record as a text block
///
/// Field order is fixed: title, authors, journal and date, identifiers,
/// abstract, then availability markers, the permalink and term lists.
pub fn render_article(record: &ArticleRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!("Title: {}\n", record.title));
    out.push_str(&format!("Authors: {}\n", record.authors_display));
    out.push_str(&format!(
        "Journal: {} ({})\n",
        record.journal_display, record.publication_date_display
    ));

    let mut ids = Vec::new();
    if record.id != FALLBACK_ID {
        ids.push(format!("PMID: {}", record.id));
    }
    if !record.secondary_id.is_empty() {
        ids.push(format!("PMCID: {}", record.secondary_id));
    }
    if !record.external_ref_id.is_empty() {
        ids.push(format!("DOI: {}", record.external_ref_id));
    }
    if !ids.is_empty() {
        out.push_str(&ids.join(" | "));
        out.push('\n');
    }

    out.push_str(&format!(
        "Abstract: {}\n",
        truncate_chars(&record.abstract_text, ABSTRACT_PREVIEW_CHARS)
    ));

    if record.has_full_text_copy {
        out.push_str("Full text available in PubMed Central\n");
    }
    if record.is_open_access {
        out.push_str("[Open Access]\n");
    }
    if let Some(url) = article_url(record) {
        out.push_str(&format!("URL: {}\n", url));
    }

    if !record.keywords.is_empty() {
        out.push_str(&format!("Keywords: {}\n", record.keywords));
    }
    if !record.mesh_terms.is_empty() {
        out.push_str(&format!("MeSH Terms: {}\n", record.mesh_terms));
    }

    out
}

/// Render a list of records under `header` with count summaries
pub fn render_article_list(records: &[ArticleRecord], header: &str) -> String {
    let open_access = records.iter().filter(|r| r.is_open_access).count();

    let mut out = String::new();
    out.push_str(header);
    out.push('\n');
    out.push_str(&format!(
        "Showing {} article{} ({} open access)\n\n",
        records.len(),
        if records.len() == 1 { "" } else { "s" },
        open_access
    ));

    let entries: Vec<String> = records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("{}. {}", i + 1, render_article(record)))
        .collect();
    out.push_str(&entries.join(ENTRY_SEPARATOR));

    out
}
