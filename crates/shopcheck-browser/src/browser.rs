//! Browser lifecycle management and process control.
//!
//! `TestBrowser` launches Chrome, drives the CDP handler, and opens pages.
//! It implements Drop so the process dies and its profile directory is
//! removed even if a test panics, but explicit `close()` is the normal path.

use crate::error::{BrowserError, Result};
use crate::page::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use futures::StreamExt;
use shopcheck_config::UiSettings;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Configuration for launching a test browser.
#[derive(Debug, Clone)]
pub struct TestBrowserConfig {
    /// Run in headless mode (default: true).
    pub headless: bool,

    /// Window and viewport size (default: 1280x720).
    pub window_size: (u32, u32),

    /// Accept self-signed and otherwise invalid certificates (default: true).
    pub ignore_https_errors: bool,

    /// Additional Chrome arguments.
    pub args: Vec<String>,

    /// Chrome executable path (None = auto-detect).
    pub chrome_path: Option<String>,
}

impl TestBrowserConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the browser window, for watching a test run.
    #[must_use]
    pub fn visible(mut self) -> Self {
        self.headless = false;
        self
    }

    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args.extend(args);
        self
    }

    /// Every Chrome argument this config launches with, in order.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = vec![format!(
            "--window-size={},{}",
            self.window_size.0, self.window_size.1
        )];

        if self.ignore_https_errors {
            args.push("--ignore-certificate-errors".to_string());
        }

        args.extend(self.args.iter().cloned());
        args
    }

    fn to_browser_config(&self, profile_dir: &Path) -> Result<BrowserConfig> {
        let mut config = BrowserConfig::builder();

        if !self.headless {
            config = config.with_head();
        }

        let (width, height) = self.window_size;
        config = config.window_size(width, height).viewport(Viewport {
            width,
            height,
            ..Viewport::default()
        });

        config = config.user_data_dir(profile_dir);

        for arg in self.launch_args() {
            config = config.arg(arg);
        }

        if let Some(path) = &self.chrome_path {
            config = config.chrome_executable(path.clone());
        }

        config.build().map_err(|e| BrowserError::LaunchFailed {
            reason: format!("invalid browser configuration: {e}"),
            source: None,
        })
    }
}

impl Default for TestBrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: (1280, 720),
            ignore_https_errors: true,
            args: vec![
                // Containers often lack the user namespaces the sandbox needs
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ],
            chrome_path: None,
        }
    }
}

impl From<&UiSettings> for TestBrowserConfig {
    fn from(settings: &UiSettings) -> Self {
        Self {
            headless: settings.headless && !cfg!(feature = "visible"),
            window_size: (settings.window_width, settings.window_height),
            ignore_https_errors: settings.ignore_https_errors,
            chrome_path: settings.chrome_path.clone(),
            ..Self::default()
        }
    }
}

/// A managed browser instance.
///
/// ```ignore
/// let browser = TestBrowser::launch(TestBrowserConfig::default()).await?;
/// let page = browser.new_page().await?;
/// page.navigate("https://www.demoblaze.com", NavigationWait::default()).await?;
/// browser.close().await?;
/// ```
pub struct TestBrowser {
    inner: Arc<Mutex<Option<Browser>>>,
    // Declared after `inner` so Chrome is killed before its profile is removed
    profile: Option<TempDir>,
    profile_path: PathBuf,
}

/// Creates a fresh Chrome profile directory.
///
/// Parallel tests must not share a profile (Chrome's ProcessSingleton lock).
/// The directory is removed when the returned handle drops.
pub(crate) fn create_profile_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("shopcheck-browser-")
        .tempdir()
        .map_err(|e| BrowserError::LaunchFailed {
            reason: "failed to create browser profile directory".to_string(),
            source: Some(Box::new(e)),
        })
}

impl TestBrowser {
    /// Launches Chrome and starts driving its CDP connection.
    ///
    /// # Errors
    ///
    /// Returns `LaunchFailed` if Chrome is not installed, not executable,
    /// or fails to start.
    pub async fn launch(config: TestBrowserConfig) -> Result<Self> {
        debug!("Launching browser with config: {:?}", config);

        let profile = create_profile_dir()?;
        let profile_path = profile.path().to_path_buf();
        let browser_config = config.to_browser_config(&profile_path)?;

        let (browser, mut handler) =
            Browser::launch(browser_config)
                .await
                .map_err(|e| BrowserError::LaunchFailed {
                    reason: "failed to launch Chrome process".to_string(),
                    source: Some(Box::new(e)),
                })?;

        // chromiumoxide only processes CDP events while the handler is polled
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser handler error: {}", e);
                }
            }
        });

        debug!("Browser launched successfully");

        Ok(Self {
            inner: Arc::new(Mutex::new(Some(browser))),
            profile: Some(profile),
            profile_path,
        })
    }

    /// Opens a blank tab with dialog capture attached.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed` if the browser has been closed.
    pub async fn new_page(&self) -> Result<Page> {
        let browser = self.inner.lock().await;

        let browser = browser.as_ref().ok_or(BrowserError::AlreadyClosed)?;

        let chrome_page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;

        Page::attach(chrome_page).await
    }

    /// Closes the browser, waits for the Chrome process to exit and removes
    /// its profile directory.
    pub async fn close(mut self) -> Result<()> {
        let taken = self.inner.lock().await.take();

        let closed = match taken {
            Some(mut browser) => {
                debug!("Closing browser gracefully");
                match browser.close().await {
                    Ok(_) => {
                        if let Err(e) = browser.wait().await {
                            warn!("Chrome process did not exit cleanly: {}", e);
                        }
                        Ok(())
                    }
                    // Dropping `browser` kills the process
                    Err(e) => Err(BrowserError::ConnectionFailed(e.to_string())),
                }
            }
            None => Ok(()),
        };

        if let Some(profile) = self.profile.take() {
            if let Err(e) = profile.close() {
                warn!(path = %self.profile_path.display(), "failed to remove browser profile: {e}");
            }
        }

        closed
    }

    /// The Chrome profile directory of this launch. It no longer exists once
    /// the browser is closed or dropped.
    pub fn profile_dir(&self) -> &Path {
        &self.profile_path
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.is_none()
    }
}

impl Drop for TestBrowser {
    fn drop(&mut self) {
        // chromiumoxide's Browser::drop kills the process if close() never took it
        let still_open = match self.inner.try_lock() {
            Ok(mut guard) => guard.take().is_some(),
            Err(_) => false,
        };
        if still_open {
            warn!("TestBrowser dropped without explicit close() - forcing shutdown via Drop");
        }
        // The profile field's own drop removes the directory afterwards
    }
}
