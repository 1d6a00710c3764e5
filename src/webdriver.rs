//! WebDriver process management.
//!
//! The spec stage needs a WebDriver endpoint. Either the operator
//! points us at one that is already running (`webdriver_url`), or we
//! spawn the driver binary ourselves and tear it down when the run
//! ends.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tracing::{debug, info};

/// Driver binary used when no path is configured.
const DEFAULT_DRIVER: &str = "chromedriver";

const STARTUP_POLLS: u32 = 20;
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A running WebDriver endpoint. Kills the spawned process (if any)
/// on drop; externally managed endpoints are left alone.
#[derive(Debug)]
pub struct DriverHandle {
    url: String,
    child: Option<Child>,
}

impl DriverHandle {
    /// Attaches to `webdriver_url` if given, otherwise spawns the
    /// driver binary on `port` and waits for its status endpoint.
    pub async fn start(
        webdriver_url: Option<&str>,
        driver_path: Option<&Path>,
        port: u16,
    ) -> Result<Self> {
        if let Some(url) = webdriver_url {
            debug!("Using externally managed WebDriver at {}", url);
            return Ok(Self { url: url.trim_end_matches('/').to_string(), child: None });
        }

        let program: OsString = driver_path
            .map(|p| p.as_os_str().to_os_string())
            .unwrap_or_else(|| DEFAULT_DRIVER.into());

        let child = Command::new(&program)
            .arg(format!("--port={port}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start WebDriver binary {:?}", program))?;

        let handle = Self { url: format!("http://127.0.0.1:{port}"), child: Some(child) };
        handle.wait_ready().await?;
        info!("WebDriver ready at {}", handle.url);
        Ok(handle)
    }

    /// Endpoint URL for new sessions.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Polls the driver's `/status` endpoint until it answers.
    async fn wait_ready(&self) -> Result<()> {
        let client = wreq::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .context("Failed to build status poll client")?;
        let status_url = format!("{}/status", self.url);

        for _ in 0..STARTUP_POLLS {
            if let Ok(response) = client.get(&status_url).send().await {
                if response.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        anyhow::bail!("WebDriver did not become ready at {}", self.url)
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        if let Some(child) = &mut self.child {
            debug!("Stopping WebDriver process");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_external_url_attaches_without_spawning() {
        let handle =
            DriverHandle::start(Some("http://127.0.0.1:9515/"), None, 9515).await.unwrap();

        assert_eq!(handle.url(), "http://127.0.0.1:9515");
        assert!(handle.child.is_none());
    }

    #[tokio::test]
    async fn test_missing_binary_is_error() {
        let path = Path::new("/nonexistent/driver-binary");
        let result = DriverHandle::start(None, Some(path), 19515).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to start WebDriver binary"));
    }
}
