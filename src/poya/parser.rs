//! Embedded search-payload extraction for Poya catalog pages.
//!
//! Search results are not in the HTML itself; the server renders them
//! into a `nineyi.dependencies = {...};` script assignment. We locate
//! that script, cut the JSON object out, and read the sale page list
//! from a fixed path inside it.

use crate::poya::models::ProductRef;
use anyhow::{Context, Result};
use regex_lite::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Marker substring identifying the payload script block.
pub const DATA_MARKER: &str = "nineyi.dependencies";

static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());

/// Non-greedy match for the payload assignment.
static DATA_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)nineyi\.dependencies\s*=\s*(\{.*?\});").unwrap());

/// Outcome of parsing one catalog page.
///
/// `End` is only produced when the payload parsed cleanly and its sale
/// page list is present but empty. A missing marker or malformed
/// payload is an `Err`, never `End` - callers rely on that distinction
/// to tell catalog exhaustion from a broken page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Products listed on this page.
    Items(Vec<ProductRef>),
    /// Clean end of catalog: the list was present and empty.
    End,
}

/// Parses one catalog search page into its listed products.
pub fn parse_catalog_page(html: &str) -> Result<Page> {
    let document = Html::parse_document(html);

    let script = document
        .select(&SCRIPT)
        .map(|e| e.text().collect::<String>())
        .find(|text| text.contains(DATA_MARKER))
        .context("search payload script not found")?;

    let block = DATA_BLOCK
        .captures(&script)
        .and_then(|caps| caps.get(1))
        .context("search payload block not found")?;

    let data: Value =
        serde_json::from_str(block.as_str()).context("search payload is not valid JSON")?;

    let items = data
        .pointer("/serverRenderData/searchResult/SalePageList")
        .and_then(Value::as_array)
        .context("SalePageList missing from payload")?;

    if items.is_empty() {
        debug!("Catalog page listed no products (end of catalog)");
        return Ok(Page::End);
    }

    let mut products = Vec::with_capacity(items.len());
    for item in items {
        let Some(id) = sale_page_id(item) else {
            trace!("Skipping sale page entry without an id");
            continue;
        };

        let title = item.get("Title").and_then(Value::as_str).unwrap_or("N/A");
        products.push(ProductRef::new(title, id));
    }

    debug!("Parsed {} products from catalog page", products.len());
    Ok(Page::Items(products))
}

/// Reads the sale page id, which the payload carries as either a JSON
/// number or a string.
fn sale_page_id(item: &Value) -> Option<String> {
    match item.get("Id") {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
