//! Bounded fan-out of spec scraping across a worker pool.

use crate::poya::models::{ProductRecord, ProductRef};
use crate::poya::specs::SpecScrape;
use crate::progress::Reporter;
use crate::table::ResultTable;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

/// Scrapes every product's spec table with at most `max_workers`
/// browser sessions in flight, then assembles the result table.
///
/// Records are collected as tasks complete, so row order follows
/// completion order - that is the contract, not an accident.
pub async fn scrape_all(
    scraper: Arc<dyn SpecScrape>,
    products: Vec<ProductRef>,
    max_workers: usize,
    reporter: &Reporter,
) -> Result<ResultTable> {
    if products.is_empty() {
        anyhow::bail!("no products to scrape specifications from");
    }

    info!("Scraping specifications for {} products", products.len());

    let bar = reporter.product_bar(products.len() as u64);
    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut tasks: JoinSet<ProductRecord> = JoinSet::new();

    for product in products {
        let scraper = Arc::clone(&scraper);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
            scraper.scrape(&product).await
        });
    }

    let mut records = Vec::with_capacity(tasks.len());
    while let Some(result) = tasks.join_next().await {
        bar.inc(1);
        match result {
            Ok(record) => records.push(record),
            Err(e) => reporter.println(format!("Worker task failed: {e}")),
        }
    }
    bar.finish_and_clear();

    info!("Collected {} product records", records.len());
    Ok(ResultTable::from_records(&records))
}
