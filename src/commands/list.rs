//! List-only command: fetch the catalog without opening a browser.

use crate::config::Config;
use crate::poya::client::{CatalogSearch, PoyaClient};
use crate::poya::list::ListFetcher;
use crate::progress::Reporter;
use anyhow::{Context, Result};

/// Fetches and prints the product list for a query.
pub struct ListCommand {
    config: Config,
}

impl ListCommand {
    /// Creates a new list command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches the catalog and returns one line per product.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let client = PoyaClient::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_client(&client, Reporter::new(), query).await
    }

    /// Fetches with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl CatalogSearch,
        reporter: Reporter,
        query: &str,
    ) -> Result<String> {
        let products = ListFetcher::new(client, reporter).fetch(query).await;

        if products.is_empty() {
            return Ok(format!("No products found for query '{query}'."));
        }

        let lines: Vec<String> =
            products.iter().map(|p| format!("{}\t{}", p.name, p.detail_url)).collect();
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

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

    #[tokio::test]
    async fn test_list_command_lines() {
        let client = MockCatalog { pages: vec![page_with(&[("A", 1), ("B", 2)]), empty_page()] };
        let cmd = ListCommand::new(Config { delay_ms: 0, ..Config::default() });

        let output =
            cmd.execute_with_client(&client, Reporter::hidden(), "soap").await.unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("A\t"));
        assert!(lines[1].contains("/SalePage/Index/2"));
    }

    #[tokio::test]
    async fn test_list_command_empty() {
        let client = MockCatalog { pages: vec![empty_page()] };
        let cmd = ListCommand::new(Config { delay_ms: 0, ..Config::default() });

        let output =
            cmd.execute_with_client(&client, Reporter::hidden(), "none").await.unwrap();

        assert!(output.contains("No products found"));
    }
}
