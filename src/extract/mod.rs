//! Selector-based field extraction
//!
//! This module turns HTML into rows using a declarative schema:
//! - Listing pages: one row per item node, fields scoped to the item
//! - Detail pages: one row from the whole page, merged into a listing row
//! - CSS selectors (via `scraper`) and path selectors (an XPath subset)
//!
//! Only the first node matched by a field's query contributes a value.
//! A field with no match, or whose node lacks the requested text or
//! attribute, is absent from the row rather than empty.

mod fetcher;
mod page;
mod path;
mod query;
mod schema;

pub use fetcher::{build_http_client, fetch_detail, fetch_page, FetchedPage};
pub use page::{extract_detail, extract_list, merge_row};
pub use path::PathQuery;
pub use query::{own_text, CompiledField, CompiledQuery};
pub use schema::{Extraction, FieldSpec, SelectorType, SpiderSpec};

use std::collections::BTreeMap;

/// Extracted values keyed by field name
pub type Row = BTreeMap<String, String>;
