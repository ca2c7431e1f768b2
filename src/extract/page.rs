//! List-page and detail-page extraction over parsed documents

use crate::extract::query::{compile_fields, extract_row, CompiledField, CompiledQuery};
use crate::extract::schema::SpiderSpec;
use crate::extract::Row;
use crate::{CrawlkitError, SelectorError};
use scraper::Html;

/// Extracts one row per item node of a listing page
///
/// Item nodes are selected from the document root with the spider's item
/// selector; each field is then queried inside its item. Only the first
/// match of a field counts, and fields with no value are left out of the row.
///
/// # Example
///
/// ```
/// use crawlkit::extract::{extract_list, FieldSpec, SelectorType, SpiderSpec};
/// use scraper::Html;
///
/// let html = Html::parse_document(r#"<ul><li><a href="/a">A</a></li><li><a>B</a></li></ul>"#);
/// let spider = SpiderSpec {
///     item_selector_type: SelectorType::Css,
///     item_selector: "li".to_string(),
///     fields: vec![
///         FieldSpec::text("title", SelectorType::Css, "a"),
///         FieldSpec::attribute("url", SelectorType::Css, "a", "href"),
///     ],
///     detail_fields: vec![],
/// };
///
/// let rows = extract_list(&html, &spider).unwrap();
/// assert_eq!(rows[0]["url"], "/a");
/// assert!(!rows[1].contains_key("url"));
/// ```
pub fn extract_list(document: &Html, spider: &SpiderSpec) -> Result<Vec<Row>, SelectorError> {
    let items = CompiledQuery::compile(spider.item_selector_type, &spider.item_selector)?;
    let fields = compile_fields(&spider.fields)?;

    let rows: Vec<Row> = items
        .select(document.root_element())
        .into_iter()
        .map(|item| extract_row(item, &fields))
        .collect();

    tracing::debug!(
        "Extracted {} rows with item selector '{}'",
        rows.len(),
        spider.item_selector
    );
    Ok(rows)
}

/// Extracts the spider's detail fields from a whole detail page
pub fn extract_detail(document: &Html, spider: &SpiderSpec) -> Result<Row, SelectorError> {
    let fields = compile_fields(&spider.detail_fields)?;
    Ok(extract_detail_compiled(document, &fields))
}

/// Detail extraction with fields compiled by the caller
pub(crate) fn extract_detail_compiled(document: &Html, fields: &[CompiledField]) -> Row {
    extract_row(document.root_element(), fields)
}

/// Merges `row` into `rows[index]`, overwriting keys already present
pub fn merge_row(rows: &mut [Row], index: usize, row: Row) -> Result<(), CrawlkitError> {
    let len = rows.len();
    let target = rows
        .get_mut(index)
        .ok_or(CrawlkitError::RowIndex { index, len })?;
    target.extend(row);
    Ok(())
}
