//! Tabular result assembly.
//!
//! Spec field names are only known after visiting each page, so the
//! schema is computed post-hoc: the column set is the union of every
//! key observed across all records, and each record is projected onto
//! that superset with empty cells for keys it never exposed.

use crate::poya::models::ProductRecord;
use std::collections::BTreeSet;

pub const NAME_COLUMN: &str = "Product Name";
pub const URL_COLUMN: &str = "Product URL";

/// Final row-oriented table. Terminal once built: nothing mutates it
/// after assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    /// `Product Name`, `Product URL`, then the sorted union of all
    /// spec field names observed.
    pub columns: Vec<String>,
    /// One row per record, in the order the records were collected.
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Builds the table from scraped records. Row order follows the
    /// input slice, which for orchestrated scrapes is completion
    /// order, not submission order.
    pub fn from_records(records: &[ProductRecord]) -> Self {
        let mut spec_columns: BTreeSet<String> = BTreeSet::new();
        for record in records {
            spec_columns.extend(record.specs.keys().cloned());
        }

        let mut columns = Vec::with_capacity(2 + spec_columns.len());
        columns.push(NAME_COLUMN.to_string());
        columns.push(URL_COLUMN.to_string());
        columns.extend(spec_columns);

        let rows = records
            .iter()
            .map(|record| {
                let mut row = Vec::with_capacity(columns.len());
                row.push(record.name.clone());
                row.push(record.detail_url.clone());
                for column in &columns[2..] {
                    row.push(record.specs.get(column).cloned().unwrap_or_default());
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Number of product rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
