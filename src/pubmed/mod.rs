//! PubMed EFetch parsing and normalization
//!
//! - `preprocessing` - XML cleaning before deserialization
//! - `deserializers` - text-with-attributes element type
//! - `xml_types` - raw EFetch document, every field optional
//! - `normalize` - reduction of a raw record to an [`ArticleRecord`]

mod deserializers;
mod normalize;
mod preprocessing;
mod xml_types;

pub use deserializers::TextNode;
pub use normalize::{normalize, strip_doi_prefix};
pub use xml_types::{PubmedArticleSet, PubmedArticleXml};

use quick_xml::de::from_str;
use tracing::{debug, instrument};

use crate::error::{PubMedError, Result};
use crate::models::ArticleRecord;
use preprocessing::strip_inline_html_tags;

/// Deserialize an EFetch response into raw article documents
///
/// A blank body is an empty set rather than an error.
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_article_set(xml: &str) -> Result<Vec<PubmedArticleXml>> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }

    let cleaned_xml = strip_inline_html_tags(xml);

    let article_set: PubmedArticleSet = from_str(&cleaned_xml)
        .map_err(|e| PubMedError::XmlError(format!("Failed to deserialize XML: {}", e)))?;

    debug!(articles = article_set.articles.len(), "Parsed EFetch response");
    Ok(article_set.articles)
}

/// Parse an EFetch response and normalize every article in document order
///
/// # Example
///
/// ```
/// use pubmed_search_mcp::pubmed::parse_articles_from_xml;
///
/// let xml = r#"<?xml version="1.0"?>
/// <PubmedArticleSet>
///   <PubmedArticle>
///     <MedlineCitation>
///       <PMID>12345678</PMID>
///       <Article>
///         <ArticleTitle>Example Article</ArticleTitle>
///         <Journal><Title>Example Journal</Title></Journal>
///       </Article>
///     </MedlineCitation>
///   </PubmedArticle>
/// </PubmedArticleSet>"#;
///
/// let records = parse_articles_from_xml(xml).unwrap();
/// assert_eq!(records[0].title, "Example Article");
/// ```
pub fn parse_articles_from_xml(xml: &str) -> Result<Vec<ArticleRecord>> {
    Ok(parse_article_set(xml)?.iter().map(normalize).collect())
}
