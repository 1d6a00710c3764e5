//! poya-crawler - Poya catalog scraper with per-product spec extraction
//!
//! Fetches a search query's full catalog from the embedded search
//! payload, then drives a bounded pool of WebDriver sessions to read
//! each product's specification table into one CSV.

pub mod commands;
pub mod config;
pub mod export;
pub mod poya;
pub mod progress;
pub mod table;
pub mod webdriver;

pub use config::Config;
pub use poya::models::{ProductRecord, ProductRef};
pub use table::ResultTable;
