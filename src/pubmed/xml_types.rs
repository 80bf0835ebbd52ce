//! Raw EFetch XML document
//!
//! Mirrors the parts of the PubMed DTD the normalizer reads. Every element is
//! optional or a possibly-empty list, so any syntactically valid document
//! deserializes; missing structure shows up as `None` through the accessors.

use serde::Deserialize;

use super::deserializers::TextNode;

/// `<PubmedBookArticle>` entries may sit between articles and are ignored.
/// Reading the split `PubmedArticle` list needs quick-xml's `overlapped-lists`.
#[derive(Debug, Default, Deserialize)]
pub struct PubmedArticleSet {
    #[serde(rename = "PubmedArticle", default)]
    pub articles: Vec<PubmedArticleXml>,
}

/// One `<PubmedArticle>` as delivered by EFetch
#[derive(Debug, Default, Deserialize)]
pub struct PubmedArticleXml {
    #[serde(rename = "MedlineCitation", default)]
    pub medline_citation: Option<MedlineCitation>,
    #[serde(rename = "PubmedData", default)]
    pub pubmed_data: Option<PubmedData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MedlineCitation {
    #[serde(rename = "PMID", default)]
    pub pmid: Option<TextNode>,
    #[serde(rename = "Article", default)]
    pub article: Option<ArticleXml>,
    #[serde(rename = "MedlineJournalInfo", default)]
    pub medline_journal_info: Option<MedlineJournalInfo>,
    #[serde(rename = "MeshHeadingList", default)]
    pub mesh_heading_list: Option<MeshHeadingList>,
    #[serde(rename = "KeywordList", default)]
    pub keyword_lists: Vec<KeywordList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArticleXml {
    #[serde(rename = "Journal", default)]
    pub journal: Option<JournalXml>,
    #[serde(rename = "ArticleTitle", default)]
    pub article_title: Option<TextNode>,
    #[serde(rename = "VernacularTitle", default)]
    pub vernacular_title: Option<TextNode>,
    #[serde(rename = "ELocationID", default)]
    pub elocation_ids: Vec<TextNode>,
    #[serde(rename = "Abstract", default)]
    pub abstract_section: Option<AbstractXml>,
    #[serde(rename = "AuthorList", default)]
    pub author_list: Option<AuthorList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JournalXml {
    #[serde(rename = "Title", default)]
    pub title: Option<TextNode>,
    #[serde(rename = "ISOAbbreviation", default)]
    pub iso_abbreviation: Option<TextNode>,
    #[serde(rename = "JournalIssue", default)]
    pub journal_issue: Option<JournalIssue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JournalIssue {
    #[serde(rename = "PubDate", default)]
    pub pub_date: Option<PubDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PubDate {
    #[serde(rename = "Year", default)]
    pub year: Option<TextNode>,
    #[serde(rename = "Month", default)]
    pub month: Option<TextNode>,
    #[serde(rename = "Day", default)]
    pub day: Option<TextNode>,
    #[serde(rename = "MedlineDate", default)]
    pub medline_date: Option<TextNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AbstractXml {
    #[serde(rename = "AbstractText", default)]
    pub texts: Vec<TextNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthorList {
    #[serde(rename = "Author", default)]
    pub authors: Vec<AuthorXml>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthorXml {
    #[serde(rename = "LastName", default)]
    pub last_name: Option<TextNode>,
    #[serde(rename = "ForeName", default)]
    pub fore_name: Option<TextNode>,
    #[serde(rename = "CollectiveName", default)]
    pub collective_name: Option<TextNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MedlineJournalInfo {
    #[serde(rename = "MedlineTA", default)]
    pub medline_ta: Option<TextNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MeshHeadingList {
    #[serde(rename = "MeshHeading", default)]
    pub headings: Vec<MeshHeadingXml>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MeshHeadingXml {
    #[serde(rename = "DescriptorName", default)]
    pub descriptor_name: Option<TextNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KeywordList {
    #[serde(rename = "Keyword", default)]
    pub keywords: Vec<TextNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PubmedData {
    #[serde(rename = "ArticleIdList", default)]
    pub article_id_list: Option<ArticleIdList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArticleIdList {
    #[serde(rename = "ArticleId", default)]
    pub ids: Vec<TextNode>,
}

impl PubmedArticleXml {
    pub fn article(&self) -> Option<&ArticleXml> {
        self.medline_citation.as_ref()?.article.as_ref()
    }

    pub fn journal(&self) -> Option<&JournalXml> {
        self.article()?.journal.as_ref()
    }

    pub fn pub_date(&self) -> Option<&PubDate> {
        self.journal()?.journal_issue.as_ref()?.pub_date.as_ref()
    }

    pub fn pmid(&self) -> Option<&str> {
        self.medline_citation.as_ref()?.pmid.as_ref()?.text()
    }

    /// `ArticleIdList` entries, empty when the list is absent
    pub fn article_ids(&self) -> &[TextNode] {
        self.pubmed_data
            .as_ref()
            .and_then(|data| data.article_id_list.as_ref())
            .map(|list| list.ids.as_slice())
            .unwrap_or_default()
    }

    /// First `ArticleId` whose `IdType` matches (case-insensitive)
    pub fn article_id(&self, id_type: &str) -> Option<&str> {
        self.article_ids()
            .iter()
            .filter(|id| {
                id.attribute("IdType")
                    .is_some_and(|t| t.eq_ignore_ascii_case(id_type))
            })
            .find_map(TextNode::text)
    }

    /// First `ELocationID` whose `EIdType` matches
    pub fn elocation_id(&self, id_type: &str) -> Option<&str> {
        self.article()?
            .elocation_ids
            .iter()
            .filter(|id| {
                id.attribute("EIdType")
                    .is_some_and(|t| t.eq_ignore_ascii_case(id_type))
            })
            .find_map(TextNode::text)
    }

    pub fn abstract_texts(&self) -> &[TextNode] {
        self.article()
            .and_then(|article| article.abstract_section.as_ref())
            .map(|section| section.texts.as_slice())
            .unwrap_or_default()
    }

    pub fn authors(&self) -> &[AuthorXml] {
        self.article()
            .and_then(|article| article.author_list.as_ref())
            .map(|list| list.authors.as_slice())
            .unwrap_or_default()
    }

    pub fn medline_ta(&self) -> Option<&str> {
        self.medline_citation
            .as_ref()?
            .medline_journal_info
            .as_ref()?
            .medline_ta
            .as_ref()?
            .text()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &TextNode> {
        self.medline_citation
            .iter()
            .flat_map(|citation| citation.keyword_lists.iter())
            .flat_map(|list| list.keywords.iter())
    }

    pub fn mesh_descriptors(&self) -> impl Iterator<Item = &TextNode> {
        self.medline_citation
            .iter()
            .filter_map(|citation| citation.mesh_heading_list.as_ref())
            .flat_map(|list| list.headings.iter())
            .filter_map(|heading| heading.descriptor_name.as_ref())
    }
}
