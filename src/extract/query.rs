//! Compiled selectors and first-match field extraction

use crate::extract::path::PathQuery;
use crate::extract::schema::{Extraction, FieldSpec, SelectorType};
use crate::extract::Row;
use crate::SelectorError;
use scraper::node::Node;
use scraper::{ElementRef, Selector};

/// A selector compiled for either query language
#[derive(Debug, Clone)]
pub enum CompiledQuery {
    Css(Selector),
    Path(PathQuery),
}

impl CompiledQuery {
    pub fn compile(selector_type: SelectorType, query: &str) -> Result<Self, SelectorError> {
        match selector_type {
            SelectorType::Css => Selector::parse(query)
                .map(Self::Css)
                .map_err(|e| SelectorError::Css {
                    query: query.to_string(),
                    message: e.to_string(),
                }),
            SelectorType::Path => PathQuery::parse(query).map(Self::Path),
        }
    }

    /// All matches under `scope`, in document order
    ///
    /// CSS matching includes `scope` itself, like a descendant-or-self search.
    pub fn select<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        match self {
            Self::Css(selector) => {
                let own = selector.matches(&scope).then_some(scope);
                own.into_iter().chain(scope.select(selector)).collect()
            }
            Self::Path(path) => path.select(scope),
        }
    }

    /// The first match under `scope`; later matches are ignored
    pub fn select_first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match self {
            Self::Css(selector) => {
                if selector.matches(&scope) {
                    Some(scope)
                } else {
                    scope.select(selector).next()
                }
            }
            Self::Path(path) => path.select_first(scope),
        }
    }
}

/// A field with its query compiled
#[derive(Debug, Clone)]
pub struct CompiledField {
    pub name: String,
    query: CompiledQuery,
    extraction: Extraction,
}

impl CompiledField {
    pub fn compile(field: &FieldSpec) -> Result<Self, SelectorError> {
        Ok(Self {
            name: field.name.clone(),
            query: CompiledQuery::compile(field.selector_type, &field.query)?,
            extraction: field.extraction.clone(),
        })
    }

    /// Value from the first match, `None` when nothing matched or the
    /// matched node lacks the text/attribute
    pub fn extract(&self, scope: ElementRef<'_>) -> Option<String> {
        let node = self.query.select_first(scope)?;
        match &self.extraction {
            Extraction::Text => own_text(node),
            Extraction::Attribute { attribute } => node.value().attr(attribute).map(str::to_string),
        }
    }
}

/// Compiles every field, failing on the first bad query
pub fn compile_fields(fields: &[FieldSpec]) -> Result<Vec<CompiledField>, SelectorError> {
    fields.iter().map(CompiledField::compile).collect()
}

/// One row from `scope`; fields without a value are left out
pub fn extract_row(scope: ElementRef<'_>, fields: &[CompiledField]) -> Row {
    fields
        .iter()
        .filter_map(|field| field.extract(scope).map(|value| (field.name.clone(), value)))
        .collect()
}

/// Text directly inside `element` before its first child element or comment
pub fn own_text(element: ElementRef<'_>) -> Option<String> {
    let mut text: Option<String> = None;
    for child in element.children() {
        match child.value() {
            Node::Text(t) => text.get_or_insert_with(String::new).push_str(&t.text),
            _ => break,
        }
    }
    text
}
