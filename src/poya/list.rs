//! Paginated catalog list fetching.

use crate::poya::client::{CatalogSearch, PAGE_SIZE};
use crate::poya::models::ProductRef;
use crate::poya::parser::{self, Page};
use crate::progress::Reporter;
use tracing::{info, warn};

/// Walks catalog search pages and accumulates the listed products.
///
/// Fetching fails softly: any transport or parse error stops the walk
/// and whatever was collected so far is returned. Only a page whose
/// item list is present and empty counts as the clean end of the
/// catalog; that page contributes no products.
pub struct ListFetcher<'a, C: CatalogSearch> {
    client: &'a C,
    reporter: Reporter,
}

impl<'a, C: CatalogSearch> ListFetcher<'a, C> {
    pub fn new(client: &'a C, reporter: Reporter) -> Self {
        Self { client, reporter }
    }

    /// Fetches every catalog page for `query`. Never fails the caller.
    pub async fn fetch(&self, query: &str) -> Vec<ProductRef> {
        let mut products: Vec<ProductRef> = Vec::new();
        let bar = self.reporter.page_spinner("Fetching product pages");
        let mut page: u32 = 0;

        loop {
            let start_index = PAGE_SIZE * page;

            let html = match self.client.search_page(query, start_index).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Aborting catalog fetch on page {}: {:#}", page, e);
                    break;
                }
            };

            match parser::parse_catalog_page(&html) {
                Ok(Page::Items(items)) => {
                    products.extend(items);
                    bar.inc(1);
                    bar.set_message(format!("({} products)", products.len()));
                    page += 1;
                }
                Ok(Page::End) => {
                    bar.inc(1);
                    info!("Completed catalog fetch ({} pages, {} products)", page + 1, products.len());
                    break;
                }
                Err(e) => {
                    // A broken page is an abort, not catalog exhaustion.
                    warn!("Aborting catalog fetch on page {}: {:#}", page, e);
                    break;
                }
            }
        }

        bar.finish_and_clear();
        products
    }
}
