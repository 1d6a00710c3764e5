//! CSV export of the final result table.

use crate::table::ResultTable;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

/// UTF-8 byte order mark. Spreadsheet tools key off it to decode
/// non-ASCII field names correctly.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Prefix for derived filenames.
pub const FILE_PREFIX: &str = "Poya";

/// Resolves the output filename: an explicit name gets `.csv` appended
/// when missing; no name derives `Poya_<query>.csv`.
pub fn resolve_filename(filename: Option<&str>, query: &str) -> String {
    match filename {
        Some(name) if name.ends_with(".csv") => name.to_string(),
        Some(name) => format!("{name}.csv"),
        None => format!("{FILE_PREFIX}_{query}.csv"),
    }
}

/// Writes the table to `<output_dir>/<filename>`. Returns true on
/// success. Write failures are logged and reported as false; no
/// partially written file is assumed valid.
pub fn export(
    table: &ResultTable,
    output_dir: &Path,
    filename: Option<&str>,
    query: &str,
) -> bool {
    let path = output_dir.join(resolve_filename(filename, query));

    match write_csv(table, &path) {
        Ok(()) => {
            info!("Data saved to {}", path.display());
            true
        }
        Err(e) => {
            error!("Failed to save {}: {:#}", path.display(), e);
            false
        }
    }
}

fn write_csv(table: &ResultTable, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(UTF8_BOM).context("Failed to write byte order mark")?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(&table.columns).context("Failed to write header row")?;
    for row in &table.rows {
        writer.write_record(row).context("Failed to write product row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poya::models::{ProductRecord, ProductRef};
    use tempfile::tempdir;

    fn make_table() -> ResultTable {
        let mut a = ProductRecord::bare(&ProductRef::new("高露潔牙膏", 1));
        a.specs.insert("品牌".to_string(), "高露潔".to_string());
        a.specs.insert("容量".to_string(), "120g, 全效".to_string());

        let mut b = ProductRecord::bare(&ProductRef::new("Soap \"pure\"", 2));
        b.specs.insert("產地".to_string(), "台灣\n進口".to_string());

        ResultTable::from_records(&[a, b])
    }

    #[test]
    fn test_resolve_filename_appends_extension() {
        assert_eq!(resolve_filename(Some("report"), "x"), "report.csv");
    }

    #[test]
    fn test_resolve_filename_keeps_extension() {
        assert_eq!(resolve_filename(Some("report.csv"), "x"), "report.csv");
    }

    #[test]
    fn test_resolve_filename_derives_from_query() {
        assert_eq!(resolve_filename(None, "toothpaste"), "Poya_toothpaste.csv");
    }

    #[test]
    fn test_export_writes_bom() {
        let dir = tempdir().unwrap();
        assert!(export(&make_table(), dir.path(), None, "toothpaste"));

        let bytes = std::fs::read(dir.path().join("Poya_toothpaste.csv")).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
    }

    #[test]
    fn test_export_roundtrip_preserves_cells() {
        let dir = tempdir().unwrap();
        let table = make_table();
        assert!(export(&table, dir.path(), Some("roundtrip"), "x"));

        let bytes = std::fs::read(dir.path().join("roundtrip.csv")).unwrap();
        let body = &bytes[UTF8_BOM.len()..];

        let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(body);
        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();

        assert_eq!(parsed[0], table.columns);
        assert_eq!(&parsed[1..], table.rows.as_slice());
    }

    #[test]
    fn test_export_missing_directory_returns_false() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does").join("not").join("exist");

        assert!(!export(&make_table(), &missing, None, "x"));
    }

    #[test]
    fn test_export_empty_table_writes_header() {
        let dir = tempdir().unwrap();
        let table = ResultTable::from_records(&[]);
        assert!(export(&table, dir.path(), Some("empty"), "x"));

        let bytes = std::fs::read(dir.path().join("empty.csv")).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.contains("Product Name"));
        assert!(text.contains("Product URL"));
    }
}
