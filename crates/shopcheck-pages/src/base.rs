//! Behavior shared by every page object.
//!
//! A [`BasePage`] binds a browser [`Page`] to the site under test and the
//! configured timeouts. Concrete pages hold one and add their own selectors;
//! the [`PageObject`] trait carries the load check they all answer.

use std::time::Duration;

use async_trait::async_trait;
use shopcheck_browser::wait::{wait_for, WaitConfig};
use shopcheck_browser::{ElementQuery, NavigationWait, Page, Site};
use shopcheck_config::UiSettings;
use tracing::debug;

use crate::error::Result;

/// Timeouts a page object works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Default budget for element waits.
    pub element: Duration,
    pub navigation: NavigationWait,
    /// Pause after a dialog-producing action, for the page to finish reacting.
    pub dialog_settle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::from(&UiSettings::default())
    }
}

impl From<&UiSettings> for Timeouts {
    fn from(settings: &UiSettings) -> Self {
        Self {
            element: settings.default_timeout(),
            navigation: NavigationWait::from(settings),
            dialog_settle: settings.dialog_settle(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BasePage<'p> {
    page: &'p Page,
    site: Site,
    timeouts: Timeouts,
}

impl<'p> BasePage<'p> {
    pub fn new(page: &'p Page, settings: &UiSettings) -> Self {
        Self::with_site(page, Site::from(settings), Timeouts::from(settings))
    }

    pub fn with_site(page: &'p Page, site: Site, timeouts: Timeouts) -> Self {
        Self {
            page,
            site,
            timeouts,
        }
    }

    pub fn page(&self) -> &'p Page {
        self.page
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Loads `base_url + path` and waits for it with the two-tier load wait.
    pub async fn navigate(&self, path: &str) -> Result<()> {
        let url = self.site.url(path);
        self.page.navigate(&url, self.timeouts.navigation).await?;
        Ok(())
    }

    /// Waits for the selector to match, by default for the element timeout.
    pub async fn wait_for_element(
        &self,
        query: impl Into<ElementQuery>,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let timeout = timeout.unwrap_or(self.timeouts.element);
        self.page.wait_for_selector(query, timeout).await?;
        Ok(())
    }

    pub async fn wait_for_visible(
        &self,
        query: impl Into<ElementQuery>,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let timeout = timeout.unwrap_or(self.timeouts.element);
        self.page.wait_for_visible(query, timeout).await?;
        Ok(())
    }

    pub async fn click_element(&self, query: impl Into<ElementQuery>) -> Result<()> {
        self.page.click(query).await?;
        Ok(())
    }

    /// Raw `textContent`.
    pub async fn get_text(&self, query: impl Into<ElementQuery>) -> Result<String> {
        Ok(self.page.text_content(query).await?)
    }

    /// `textContent` with surrounding whitespace removed.
    pub async fn get_trimmed_text(&self, query: impl Into<ElementQuery>) -> Result<String> {
        let text = self.get_text(query).await?;
        Ok(text.trim().to_string())
    }

    pub async fn get_attribute(
        &self,
        query: impl Into<ElementQuery>,
        name: &str,
    ) -> Result<Option<String>> {
        Ok(self.page.attribute(query, name).await?)
    }

    pub async fn is_visible(&self, query: impl Into<ElementQuery>) -> Result<bool> {
        Ok(self.page.is_visible(&query.into()).await?)
    }

    pub async fn is_enabled(&self, query: impl Into<ElementQuery>) -> Result<bool> {
        Ok(self.page.is_enabled(&query.into()).await?)
    }

    pub async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.page.count(selector).await?)
    }

    /// Clicks an element that navigates, then waits for the new page.
    pub async fn click_and_settle(&self, query: impl Into<ElementQuery>) -> Result<()> {
        let query = query.into();
        let before = self.page.url().await?;
        self.page.click(&query).await?;
        debug!(%query, from = %before, "waiting for click navigation");
        self.settle_from(&before).await
    }

    /// Waits for navigation away from `previous_url` to finish loading.
    pub async fn settle_from(&self, previous_url: &str) -> Result<()> {
        self.page
            .settle_after_click(previous_url, self.timeouts.navigation)
            .await?;
        Ok(())
    }
}

/// A page of the storefront.
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Short name used in log and error messages.
    const NAME: &'static str;

    fn base(&self) -> &BasePage<'_>;

    /// Whether the page's landmark elements are showing. Read failures
    /// count as not loaded.
    async fn is_page_loaded(&self) -> bool;

    /// Polls [`PageObject::is_page_loaded`] until it holds.
    async fn wait_until_loaded(&self, timeout: Duration) -> Result<()> {
        wait_for(
            || self.is_page_loaded(),
            WaitConfig::with_timeout(timeout),
            &format!("{} page to load", Self::NAME),
        )
        .await?;
        Ok(())
    }
}
