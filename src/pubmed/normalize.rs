//! Reduction of a raw EFetch record to an [`ArticleRecord`]
//!
//! Each field is extracted independently as a chain of "try this element, else
//! that one", ending in a fallback literal. Nothing here can fail.

use super::deserializers::TextNode;
use super::xml_types::{AuthorXml, PubmedArticleXml};
use crate::models::{
    ArticleRecord, FALLBACK_ABSTRACT, FALLBACK_AUTHORS, FALLBACK_DATE, FALLBACK_ID,
    FALLBACK_JOURNAL, FALLBACK_TITLE,
};

const DOI_PREFIXES: [&str; 4] = [
    "https://doi.org/",
    "http://doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

/// Normalize one EFetch `<PubmedArticle>` into a canonical record
pub fn normalize(raw: &PubmedArticleXml) -> ArticleRecord {
    let id = extract_id(raw).unwrap_or(FALLBACK_ID).to_string();
    let secondary_id = raw.article_id("pmc").unwrap_or_default().to_string();
    let has_full_text_copy = !secondary_id.is_empty();

    ArticleRecord {
        id,
        title: extract_title(raw).unwrap_or(FALLBACK_TITLE).to_string(),
        authors_display: non_empty_or(format_authors(raw.authors()), FALLBACK_AUTHORS),
        journal_display: extract_journal(raw).unwrap_or(FALLBACK_JOURNAL).to_string(),
        publication_date_display: extract_pub_date(raw)
            .unwrap_or_else(|| FALLBACK_DATE.to_string()),
        external_ref_id: extract_doi(raw).unwrap_or_default(),
        abstract_text: non_empty_or(format_abstract(raw.abstract_texts()), FALLBACK_ABSTRACT),
        keywords: join_terms(raw.keywords()),
        mesh_terms: join_terms(raw.mesh_descriptors()),
        secondary_id,
        has_full_text_copy,
        is_open_access: has_full_text_copy,
    }
}

fn extract_id(raw: &PubmedArticleXml) -> Option<&str> {
    raw.pmid().or_else(|| raw.article_id("pubmed"))
}

fn extract_title(raw: &PubmedArticleXml) -> Option<&str> {
    let article = raw.article()?;
    article
        .article_title
        .as_ref()
        .and_then(TextNode::text)
        .or_else(|| article.vernacular_title.as_ref().and_then(TextNode::text))
}

fn extract_journal(raw: &PubmedArticleXml) -> Option<&str> {
    let journal = raw.journal();
    journal
        .and_then(|j| j.title.as_ref())
        .and_then(TextNode::text)
        .or_else(|| {
            journal
                .and_then(|j| j.iso_abbreviation.as_ref())
                .and_then(TextNode::text)
        })
        .or_else(|| raw.medline_ta())
}

fn extract_pub_date(raw: &PubmedArticleXml) -> Option<String> {
    let pub_date = raw.pub_date()?;

    let parts: Vec<&str> = [&pub_date.year, &pub_date.month, &pub_date.day]
        .into_iter()
        .filter_map(|part| part.as_ref().and_then(TextNode::text))
        .collect();

    if parts.is_empty() {
        pub_date
            .medline_date
            .as_ref()
            .and_then(TextNode::text)
            .map(str::to_string)
    } else {
        Some(parts.join(" "))
    }
}

fn extract_doi(raw: &PubmedArticleXml) -> Option<String> {
    raw.article_id("doi")
        .or_else(|| raw.elocation_id("doi"))
        .map(strip_doi_prefix)
        .filter(|doi| !doi.is_empty())
        .map(str::to_string)
}

/// Remove a `doi:` or resolver URL prefix from a DOI
pub fn strip_doi_prefix(doi: &str) -> &str {
    let doi = doi.trim();
    DOI_PREFIXES
        .iter()
        .find_map(|prefix| {
            doi.get(..prefix.len())
                .filter(|head| head.eq_ignore_ascii_case(prefix))
                .map(|_| &doi[prefix.len()..])
        })
        .unwrap_or(doi)
        .trim()
}

fn format_abstract(texts: &[TextNode]) -> String {
    texts
        .iter()
        .filter_map(|fragment| {
            let text = fragment.text()?;
            match fragment.attribute("Label").map(str::trim) {
                Some(label) if !label.is_empty() => Some(format!("{}: {}", label, text)),
                _ => Some(text.to_string()),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_author(author: &AuthorXml) -> Option<String> {
    let last = author.last_name.as_ref().and_then(TextNode::text);
    let fore = author.fore_name.as_ref().and_then(TextNode::text);

    match (fore, last) {
        (Some(fore), Some(last)) => Some(format!("{} {}", fore, last)),
        (None, Some(last)) => Some(last.to_string()),
        _ => author
            .collective_name
            .as_ref()
            .and_then(TextNode::text)
            .map(str::to_string),
    }
}

fn format_authors(authors: &[AuthorXml]) -> String {
    authors
        .iter()
        .filter_map(format_author)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_terms<'a>(terms: impl Iterator<Item = &'a TextNode>) -> String {
    terms.filter_map(TextNode::text).collect::<Vec<_>>().join(", ")
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
