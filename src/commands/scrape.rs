//! Full pipeline command: catalog fetch, spec scraping, CSV export.

use crate::config::Config;
use crate::export;
use crate::poya::client::{CatalogSearch, PoyaClient};
use crate::poya::list::ListFetcher;
use crate::poya::orchestrator;
use crate::poya::specs::{SpecScrape, SpecScraper};
use crate::progress::Reporter;
use crate::webdriver::DriverHandle;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Executes the complete scrape workflow for one query.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the pipeline end to end, managing the WebDriver process.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let client = PoyaClient::new(&self.config).context("Failed to create HTTP client")?;

        let driver = DriverHandle::start(
            self.config.webdriver_url.as_deref(),
            self.config.driver_path.as_deref(),
            self.config.driver_port,
        )
        .await
        .context("Failed to start WebDriver")?;

        let scraper = Arc::new(SpecScraper::new(
            driver.url(),
            Duration::from_secs(self.config.element_timeout_secs),
        ));

        self.execute_with(&client, scraper, Reporter::new(), query).await
    }

    /// Runs the pipeline with injected collaborators (for testing).
    pub async fn execute_with(
        &self,
        client: &impl CatalogSearch,
        scraper: Arc<dyn SpecScrape>,
        reporter: Reporter,
        query: &str,
    ) -> Result<String> {
        // The one failure that aborts the run: an unusable output directory.
        std::fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.config.output_dir.display())
        })?;

        reporter.println(format!("Searching for products with query: '{query}'"));

        let products = ListFetcher::new(client, reporter.clone()).fetch(query).await;
        if products.is_empty() {
            info!("No products found for query '{}'", query);
            return Ok(format!("No products found for query '{query}'."));
        }
        reporter.println(format!("Scraping specifications for {} products", products.len()));

        let table =
            orchestrator::scrape_all(scraper, products, self.config.max_workers, &reporter)
                .await?;

        let saved = export::export(
            &table,
            &self.config.output_dir,
            self.config.filename.as_deref(),
            query,
        );
        if !saved {
            return Ok("Scrape finished but the export failed; see the log for details."
                .to_string());
        }

        let spec_columns = table.columns.len().saturating_sub(2);
        Ok(format!(
            "Scraped {} products with {} spec fields for query '{}'",
            table.len(),
            spec_columns,
            query
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poya::models::{ProductRecord, ProductRef};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    struct MockCatalog {
        pages: Vec<String>,
    }

    #[async_trait]
    impl CatalogSearch for MockCatalog {
        async fn search_page(&self, _query: &str, start_index: u32) -> Result<String> {
            let idx = (start_index / 50) as usize;
            Ok(self.pages.get(idx).cloned().unwrap_or_else(empty_page))
        }
    }

    struct MockSpecScraper;

    #[async_trait]
    impl SpecScrape for MockSpecScraper {
        async fn scrape(&self, product: &ProductRef) -> ProductRecord {
            let mut specs = BTreeMap::new();
            specs.insert("品牌".to_string(), format!("{}牌", product.name));
            ProductRecord {
                name: product.name.clone(),
                detail_url: product.detail_url.clone(),
                specs,
            }
        }
    }

    fn page_with(items: &[(&str, u64)]) -> String {
        let entries: Vec<String> = items
            .iter()
            .map(|(title, id)| format!(r#"{{"Title":"{title}","Id":{id}}}"#))
            .collect();
        format!(
            r#"<html><script>nineyi.dependencies = {{"serverRenderData":{{"searchResult":{{"SalePageList":[{}]}}}}}};</script></html>"#,
            entries.join(",")
        )
    }

    fn empty_page() -> String {
        page_with(&[])
    }

    fn make_test_config(output_dir: std::path::PathBuf) -> Config {
        Config { delay_ms: 0, max_workers: 2, output_dir, ..Config::default() }
    }

    #[tokio::test]
    async fn test_scrape_command_writes_csv() {
        let dir = tempdir().unwrap();
        let config = make_test_config(dir.path().to_path_buf());

        let client =
            MockCatalog { pages: vec![page_with(&[("A", 1), ("B", 2)]), empty_page()] };
        let cmd = ScrapeCommand::new(config);

        let summary = cmd
            .execute_with(&client, Arc::new(MockSpecScraper), Reporter::hidden(), "soap")
            .await
            .unwrap();

        assert!(summary.contains("Scraped 2 products"));

        let csv_path = dir.path().join("Poya_soap.csv");
        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert!(content.contains("Product Name"));
        assert!(content.contains("品牌"));
        assert!(content.contains("A牌"));
    }

    #[tokio::test]
    async fn test_scrape_command_creates_output_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("out").join("nested");
        let config = make_test_config(nested.clone());

        let client = MockCatalog { pages: vec![page_with(&[("A", 1)]), empty_page()] };
        let cmd = ScrapeCommand::new(config);

        cmd.execute_with(&client, Arc::new(MockSpecScraper), Reporter::hidden(), "soap")
            .await
            .unwrap();

        assert!(nested.join("Poya_soap.csv").exists());
    }

    #[tokio::test]
    async fn test_scrape_command_no_products() {
        let dir = tempdir().unwrap();
        let config = make_test_config(dir.path().to_path_buf());

        let client = MockCatalog { pages: vec![empty_page()] };
        let cmd = ScrapeCommand::new(config);

        let summary = cmd
            .execute_with(&client, Arc::new(MockSpecScraper), Reporter::hidden(), "nothing")
            .await
            .unwrap();

        assert!(summary.contains("No products found"));
        assert!(!dir.path().join("Poya_nothing.csv").exists());
    }

    #[tokio::test]
    async fn test_scrape_command_custom_filename() {
        let dir = tempdir().unwrap();
        let mut config = make_test_config(dir.path().to_path_buf());
        config.filename = Some("run-output".to_string());

        let client = MockCatalog { pages: vec![page_with(&[("A", 1)]), empty_page()] };
        let cmd = ScrapeCommand::new(config);

        cmd.execute_with(&client, Arc::new(MockSpecScraper), Reporter::hidden(), "soap")
            .await
            .unwrap();

        assert!(dir.path().join("run-output.csv").exists());
    }
}
