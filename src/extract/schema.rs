//! Declarative field-extraction schema

use serde::{Deserialize, Serialize};

/// Query language of a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorType {
    #[serde(rename = "css")]
    Css,
    #[serde(rename = "xpath", alias = "path")]
    Path,
}

/// What to read from the first matched node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "extract_type", rename_all = "lowercase")]
pub enum Extraction {
    /// The node's own leading text
    Text,
    /// The value of the named attribute
    Attribute { attribute: String },
}

/// One output column of an extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Output key in the row
    pub name: String,

    #[serde(rename = "type")]
    pub selector_type: SelectorType,

    /// Selector expression, scoped to the item node (or the page for detail fields)
    pub query: String,

    #[serde(flatten)]
    pub extraction: Extraction,
}

impl FieldSpec {
    /// A field reading the matched node's text
    pub fn text(name: &str, selector_type: SelectorType, query: &str) -> Self {
        Self {
            name: name.to_string(),
            selector_type,
            query: query.to_string(),
            extraction: Extraction::Text,
        }
    }

    /// A field reading an attribute of the matched node
    pub fn attribute(name: &str, selector_type: SelectorType, query: &str, attribute: &str) -> Self {
        Self {
            name: name.to_string(),
            selector_type,
            query: query.to_string(),
            extraction: Extraction::Attribute {
                attribute: attribute.to_string(),
            },
        }
    }
}

/// Extraction target for one spider: list items plus optional detail fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiderSpec {
    pub item_selector_type: SelectorType,
    pub item_selector: String,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub detail_fields: Vec<FieldSpec>,
}
