//! XML cleanup applied before deserializing EFetch responses

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Strip inline formatting tags from XML content
///
/// Titles and abstracts embed tags like `<i>`, `<sup>`, `<sub>` inside text
/// elements. quick-xml's serde layer would see them as child elements and drop
/// the surrounding text, so they are removed up front.
///
/// ```ignore
/// let xml = "<AbstractText>CO<sup>2</sup> levels</AbstractText>";
/// assert_eq!(strip_inline_html_tags(xml), "<AbstractText>CO2 levels</AbstractText>");
/// ```
pub(crate) fn strip_inline_html_tags(xml: &str) -> String {
    static INLINE_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = INLINE_TAG_REGEX.get_or_init(|| {
        Regex::new(r"</?(?:i|b|u|sup|sub|em|strong|italic|bold)(?:\s[^>]*)?>")
            .expect("inline tag regex is valid")
    });

    let cleaned = re.replace_all(xml, "");

    if cleaned.len() != xml.len() {
        debug!(
            original = xml.len(),
            cleaned = cleaned.len(),
            "Stripped inline HTML tags"
        );
    }

    cleaned.into_owned()
}
