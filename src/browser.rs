//! Browser session lifecycle.
//!
//! One chromiumoxide browser per run, launched with stealth arguments and
//! a throwaway profile directory. The CDP event handler runs on a tracked
//! task that MUST be aborted when the session ends, otherwise it outlives
//! the browser process.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::{self, JoinHandle};
use tracing::{info, warn};

/// User agent presented to the target site.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// A launched browser plus its event-handler task and profile directory.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserSession {
    /// Launch a browser with stealth configuration. `executable` overrides
    /// chromiumoxide's binary auto-detection when given.
    pub async fn launch(headless: bool, executable: Option<&Path>) -> Result<Self> {
        let user_data_dir =
            std::env::temp_dir().join(format!("placescrape_chrome_{}", std::process::id()));
        std::fs::create_dir_all(&user_data_dir)
            .context("failed to create browser profile directory")?;

        let mut config_builder = BrowserConfigBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .window_size(1280, 1024)
            .user_data_dir(user_data_dir.clone())
            .arg(format!("--user-agent={USER_AGENT}"))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-notifications")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--disable-background-networking")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--mute-audio");
        config_builder = if headless {
            config_builder.headless_mode(HeadlessMode::default())
        } else {
            config_builder.with_head()
        };
        if let Some(path) = executable {
            config_builder = config_builder.chrome_executable(path);
        }
        let browser_config = match config_builder.build() {
            Ok(config) => config,
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_dir_all(&user_data_dir) {
                    warn!(path = %user_data_dir.display(), "failed to remove profile directory: {cleanup}");
                }
                return Err(anyhow::anyhow!("failed to build browser config: {e}"));
            }
        };

        info!(headless, "launching browser");
        let (browser, mut handler) = match Browser::launch(browser_config).await {
            Ok(launched) => launched,
            Err(e) => {
                // Nothing ever ran against the profile dir, drop it now.
                if let Err(cleanup) = std::fs::remove_dir_all(&user_data_dir) {
                    warn!(path = %user_data_dir.display(), "failed to remove profile directory: {cleanup}");
                }
                return Err(anyhow::Error::from(e).context("failed to launch browser"));
            }
        };

        let handler_task = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::error!("browser handler error: {e:?}");
                }
            }
            info!("browser event handler task completed");
        });

        Ok(Self {
            browser,
            handler: handler_task,
            user_data_dir: Some(user_data_dir),
        })
    }

    /// Open a fresh blank page on this session.
    pub async fn new_page(&self) -> Result<Page> {
        self.browser
            .new_page("about:blank")
            .await
            .context("failed to open page")
    }

    /// Close the browser gracefully and remove the profile directory.
    ///
    /// Best effort by design: a dead browser process must not keep the
    /// final output from being written.
    pub async fn shutdown(mut self) {
        info!("shutting down browser session");
        if let Err(e) = self.browser.close().await {
            warn!("failed to close browser cleanly: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("failed to wait for browser exit: {e}");
        }
        self.cleanup_profile_dir();
    }

    /// Remove the throwaway profile directory. Must run after the browser
    /// process has exited; Chrome keeps file handles open until then.
    fn cleanup_profile_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(path = %path.display(), "failed to remove profile directory: {e}");
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser::drop kills the Chrome process if shutdown() never ran.
        if self.user_data_dir.is_some() {
            warn!("browser session dropped without explicit shutdown, removing profile directory");
            self.cleanup_profile_dir();
        }
    }
}
