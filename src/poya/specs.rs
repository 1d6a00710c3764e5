//! Per-product specification scraping via WebDriver.
//!
//! The spec panel on a detail page is rendered client-side and only
//! populated after its tab is activated, so this stage drives a real
//! browser. Each product gets its own session: no cookie or DOM state
//! crosses between products, and sessions can run in parallel.

use crate::poya::models::{ProductRecord, ProductRef};
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use thirtyfour::ChromeCapabilities;
use tracing::debug;

/// Tab control that reveals the specification panel.
const SPEC_TAB: &str = r##"a[href="#salepage-specification"]"##;
/// Specification table container.
const SPEC_TABLE: &str = ".simple-table";
/// One label/value row.
const SPEC_ROW: &str = ".simple-table .simple-table-row";
/// Label cell within a row.
const SPEC_LABEL: &str = ".simple-table-td-left";
/// Value cell within a row.
const SPEC_VALUE: &str = ".simple-table-td-right";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Trait for detail-page spec extraction - enables mocking for tests.
#[async_trait]
pub trait SpecScrape: Send + Sync {
    /// Scrapes one product's spec table. Infallible by contract: every
    /// element-not-found and timeout condition degrades to a record
    /// with empty specs.
    async fn scrape(&self, product: &ProductRef) -> ProductRecord;
}

/// WebDriver-backed spec scraper.
pub struct SpecScraper {
    webdriver_url: String,
    timeout: Duration,
}

impl SpecScraper {
    /// Creates a scraper that opens sessions against `webdriver_url`
    /// and bounds every element wait by `timeout`.
    pub fn new(webdriver_url: impl Into<String>, timeout: Duration) -> Self {
        Self { webdriver_url: webdriver_url.into(), timeout }
    }

    /// Headless browser profile: no GPU, fixed viewport, images off.
    fn capabilities() -> WebDriverResult<ChromeCapabilities> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--headless=new")?;
        caps.add_arg("--disable-gpu")?;
        caps.add_arg("--window-size=1920,1080")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg("--disable-extensions")?;
        caps.add_arg("--blink-settings=imagesEnabled=false")?;
        Ok(caps)
    }

    /// Navigates to the detail page and harvests the spec table rows.
    async fn read_specs(
        &self,
        driver: &WebDriver,
        url: &str,
    ) -> WebDriverResult<Vec<(String, String)>> {
        driver.goto(url).await?;

        let tab =
            driver.query(By::Css(SPEC_TAB)).wait(self.timeout, POLL_INTERVAL).first().await?;
        tab.wait_until().wait(self.timeout, POLL_INTERVAL).clickable().await?;
        tab.click().await?;

        driver.query(By::Css(SPEC_TABLE)).wait(self.timeout, POLL_INTERVAL).first().await?;

        let rows = driver.find_all(By::Css(SPEC_ROW)).await?;
        let mut specs = Vec::with_capacity(rows.len());
        for row in rows {
            let label = row.find(By::Css(SPEC_LABEL)).await?.text().await?;
            let value = row.find(By::Css(SPEC_VALUE)).await?.text().await?;
            specs.push((label.trim().to_string(), value.trim().to_string()));
        }

        Ok(specs)
    }
}

#[async_trait]
impl SpecScrape for SpecScraper {
    async fn scrape(&self, product: &ProductRef) -> ProductRecord {
        let mut record = ProductRecord::bare(product);

        let caps = match Self::capabilities() {
            Ok(caps) => caps,
            Err(e) => {
                debug!("Failed to build browser capabilities: {}", e);
                return record;
            }
        };

        let driver = match WebDriver::new(&self.webdriver_url, caps).await {
            Ok(driver) => driver,
            Err(e) => {
                debug!("No browser session for {}: {}", product.detail_url, e);
                return record;
            }
        };

        match self.read_specs(&driver, &product.detail_url).await {
            Ok(specs) => {
                // Duplicate labels: last row wins.
                for (label, value) in specs {
                    record.specs.insert(label, value);
                }
            }
            Err(e) => debug!("No specs for {}: {}", product.detail_url, e),
        }

        // The session must be released on every exit path.
        if let Err(e) = driver.quit().await {
            debug!("Failed to close browser session: {}", e);
        }

        record
    }
}
