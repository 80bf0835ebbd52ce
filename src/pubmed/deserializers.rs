//! Custom serde deserializers for PubMed XML text elements
//!
//! Many EFetch elements carry text plus attributes (`<ArticleId IdType="doi">`,
//! `<AbstractText Label="METHODS">`, `<Keyword MajorTopicYN="N">`), and some are
//! bare text. [`TextNode`] accepts both shapes.

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::result;

/// Text content of an element together with its attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextNode {
    text: Option<String>,
    attributes: Vec<(String, String)>,
}

impl TextNode {
    /// Trimmed text content, `None` when absent or blank
    pub fn text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Attribute value by name (without the `@` prefix)
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl From<&str> for TextNode {
    fn from(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            attributes: Vec::new(),
        }
    }
}

impl<'de> Deserialize<'de> for TextNode {
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TextNodeVisitor;

        impl<'de> Visitor<'de> for TextNodeVisitor {
            type Value = TextNode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("element text with optional attributes")
            }

            fn visit_str<E>(self, value: &str) -> result::Result<TextNode, E>
            where
                E: de::Error,
            {
                Ok(TextNode::from(value))
            }

            fn visit_string<E>(self, value: String) -> result::Result<TextNode, E>
            where
                E: de::Error,
            {
                Ok(TextNode {
                    text: Some(value),
                    attributes: Vec::new(),
                })
            }

            fn visit_unit<E>(self) -> result::Result<TextNode, E>
            where
                E: de::Error,
            {
                Ok(TextNode::default())
            }

            fn visit_map<M>(self, mut map: M) -> result::Result<TextNode, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut text_parts = Vec::new();
                let mut attributes = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key == "$text" || key == "$value" {
                        let value: String = map.next_value()?;
                        text_parts.push(value);
                    } else if let Some(name) = key.strip_prefix('@') {
                        let value: String = map.next_value()?;
                        attributes.push((name.to_string(), value));
                    } else {
                        // Nested child elements carry no text we use
                        let _: IgnoredAny = map.next_value()?;
                    }
                }

                let text = if text_parts.is_empty() {
                    None
                } else {
                    Some(text_parts.join(" "))
                };

                Ok(TextNode { text, attributes })
            }
        }

        deserializer.deserialize_any(TextNodeVisitor)
    }
}
