//! Data models for Poya catalog entries and scraped products.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Detail page URL template; the sale page id from the search payload
/// is appended as the final path segment.
pub const SALE_PAGE_URL: &str = "https://www.poyabuy.com.tw/SalePage/Index";

/// A product as listed in catalog search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Product title from the search payload
    pub name: String,
    /// Absolute detail page URL
    pub detail_url: String,
}

impl ProductRef {
    /// Creates a ref from a title and sale page id.
    pub fn new(name: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self { name: name.into(), detail_url: format!("{}/{}", SALE_PAGE_URL, id) }
    }
}

/// A product enriched with the specification fields read from its
/// detail page. The key set varies per product; two records may expose
/// disjoint fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub detail_url: String,
    /// Spec label -> value, as shown on the page. Empty when the page
    /// has no specification tab.
    pub specs: BTreeMap<String, String>,
}

impl ProductRecord {
    /// Creates a record with no specs for the given catalog entry.
    pub fn bare(product: &ProductRef) -> Self {
        Self {
            name: product.name.clone(),
            detail_url: product.detail_url.clone(),
            specs: BTreeMap::new(),
        }
    }

    /// Returns true if no specification fields were extracted.
    pub fn is_bare(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_from_numeric_id() {
        let product = ProductRef::new("Toothpaste", 123456);
        assert_eq!(product.name, "Toothpaste");
        assert_eq!(product.detail_url, "https://www.poyabuy.com.tw/SalePage/Index/123456");
    }

    #[test]
    fn test_ref_from_string_id() {
        let product = ProductRef::new("Soap", "987");
        assert_eq!(product.detail_url, "https://www.poyabuy.com.tw/SalePage/Index/987");
    }

    #[test]
    fn test_bare_record() {
        let product = ProductRef::new("Soap", 1);
        let record = ProductRecord::bare(&product);
        assert_eq!(record.name, "Soap");
        assert_eq!(record.detail_url, product.detail_url);
        assert!(record.is_bare());
    }

    #[test]
    fn test_record_with_specs_not_bare() {
        let product = ProductRef::new("Soap", 1);
        let mut record = ProductRecord::bare(&product);
        record.specs.insert("品牌".to_string(), "POYA".to_string());
        assert!(!record.is_bare());
    }

    #[test]
    fn test_record_serde() {
        let product = ProductRef::new("Soap", 1);
        let mut record = ProductRecord::bare(&product);
        record.specs.insert("產地".to_string(), "台灣".to_string());

        let json = serde_json::to_string(&record).unwrap();
        let parsed: ProductRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
