//! Per-test browser fixture.
//!
//! [`UiSession::run`] gives a test body a fresh browser and page and always
//! tears both down afterwards, whether the body succeeds, fails or panics.
//!
//! ```ignore
//! UiSession::run(&settings.ui, |session| {
//!     Box::pin(async move {
//!         let home = session.home();
//!         home.navigate().await?;
//!         assert!(home.is_page_loaded().await);
//!         Ok(())
//!     })
//! })
//! .await?;
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use futures::future::BoxFuture;
use futures::FutureExt;
use shopcheck_browser::{Page, TestBrowser, TestBrowserConfig};
use shopcheck_config::UiSettings;
use tracing::{debug, warn};

use crate::base::BasePage;
use crate::cart::CartPage;
use crate::details::ProductDetailsPage;
use crate::error::Result;
use crate::home::HomePage;

/// What a test body gets: the page and the settings it was opened with.
#[derive(Debug, Clone, Copy)]
pub struct Session<'s> {
    page: &'s Page,
    settings: &'s UiSettings,
    profile_dir: &'s Path,
}

impl<'s> Session<'s> {
    pub fn new(page: &'s Page, settings: &'s UiSettings, profile_dir: &'s Path) -> Self {
        Self {
            page,
            settings,
            profile_dir,
        }
    }

    pub fn page(&self) -> &'s Page {
        self.page
    }

    pub fn settings(&self) -> &'s UiSettings {
        self.settings
    }

    /// The browser's profile directory, removed when the session ends.
    pub fn profile_dir(&self) -> &'s Path {
        self.profile_dir
    }

    pub fn base(&self) -> BasePage<'s> {
        BasePage::new(self.page, self.settings)
    }

    pub fn home(&self) -> HomePage<'s> {
        HomePage::new(self.base())
    }

    pub fn product_details(&self) -> ProductDetailsPage<'s> {
        ProductDetailsPage::new(self.base())
    }

    pub fn cart(&self) -> CartPage<'s> {
        CartPage::new(self.base())
    }
}

pub struct UiSession;

impl UiSession {
    /// Runs `body` against a freshly launched browser.
    ///
    /// Settings are validated before anything launches. The page and
    /// browser are closed unconditionally. A panic in `body` is resumed
    /// after cleanup; otherwise the body's error wins over a cleanup error.
    pub async fn run<T, F>(settings: &UiSettings, body: F) -> Result<T>
    where
        T: Send,
        F: for<'s> FnOnce(Session<'s>) -> BoxFuture<'s, Result<T>>,
    {
        settings.validate()?;

        let browser = TestBrowser::launch(TestBrowserConfig::from(settings)).await?;

        let page = match browser.new_page().await {
            Ok(page) => page,
            Err(err) => {
                if let Err(close_err) = browser.close().await {
                    warn!("failed to close browser after page error: {close_err}");
                }
                return Err(err.into());
            }
        };

        let session = Session::new(&page, settings, browser.profile_dir());
        let outcome = AssertUnwindSafe(body(session))
            .catch_unwind()
            .await;

        let cleanup = Self::teardown(browser, page).await;

        match outcome {
            Err(panic) => panic::resume_unwind(panic),
            Ok(Err(err)) => {
                if let Err(cleanup_err) = cleanup {
                    warn!("teardown also failed: {cleanup_err}");
                }
                Err(err)
            }
            Ok(Ok(value)) => cleanup.map(|()| value),
        }
    }

    async fn teardown(browser: TestBrowser, page: Page) -> Result<()> {
        debug!("closing session page and browser");
        let page_closed = page.close().await;
        let browser_closed = browser.close().await;
        page_closed?;
        browser_closed?;
        Ok(())
    }
}
