//! Page-level browser operations: navigation, element reads, clicks and waits.
//!
//! Element reads go through [`ElementQuery`] scripts that return JSON text,
//! so a missing element comes back as a clean `null` rather than an
//! evaluation error. Clicks use real CDP mouse events on the resolved
//! element.

use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::element::Element;
use chromiumoxide::page::Page as ChromePage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::dialog::{spawn_dialog_handler, DialogExpectation, DialogInbox};
use crate::error::{BrowserError, Result};
use crate::query::{js_string, scripts, ElementQuery};
use crate::wait::{wait_for_result, with_fallback, LoadState, NavigationWait, WaitConfig};

/// Layout box of an element, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Deserialize)]
struct AttributeValue {
    value: Option<String>,
}

/// A browser tab.
///
/// Every page accepts native dialogs automatically; see [`Page::expect_dialog`].
#[derive(Debug)]
pub struct Page {
    inner: Arc<ChromePage>,
    dialogs: DialogInbox,
    dialog_task: JoinHandle<()>,
}

impl Page {
    /// Wraps a freshly opened tab. The dialog subscription is live once this
    /// returns.
    pub(crate) async fn attach(page: ChromePage) -> Result<Self> {
        let inner = Arc::new(page);
        let (dialogs, dialog_task) = spawn_dialog_handler(inner.clone()).await?;

        Ok(Self {
            inner,
            dialogs,
            dialog_task,
        })
    }

    /// Navigates to an absolute URL, then runs the two-tier load wait.
    ///
    /// # Errors
    ///
    /// `NavigationFailed` if the browser rejects the navigation, or the
    /// `WaitTimeout` of the fallback tier.
    pub async fn navigate(&self, url: &str, wait: NavigationWait) -> Result<()> {
        debug!(%url, "navigating");

        self.inner
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        self.wait_for_navigation(wait).await
    }

    /// Waits for DOM content, falling back to full load on a timeout.
    pub async fn wait_for_navigation(&self, wait: NavigationWait) -> Result<()> {
        with_fallback(|state, timeout| self.wait_for_load_state(state, timeout), wait).await
    }

    /// Polls `document.readyState` until it reaches `state`.
    pub async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()> {
        wait_for_result(
            move || async move {
                let ready: String = self.evaluate("document.readyState").await?;
                Ok(state.is_reached_by(&ready))
            },
            WaitConfig::with_timeout(timeout),
            state.describe(),
        )
        .await
    }

    /// Executes JavaScript in the page context and returns the result.
    ///
    /// Scripts that can yield `null` or `undefined` should wrap their value
    /// in `JSON.stringify` and decode the string instead.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails or the result cannot be deserialized.
    pub async fn evaluate<T>(&self, script: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let result = self
            .inner
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))?;

        result
            .into_value()
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))
    }

    /// Runs a script for its side effects.
    pub async fn execute(&self, script: &str) -> Result<()> {
        self.inner
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))?;
        Ok(())
    }

    async fn read<T>(&self, query: &ElementQuery, body: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let script = query.script(body)?;
        let json: String = self.evaluate(&script).await?;
        serde_json::from_str(&json).map_err(|e| {
            BrowserError::ScriptExecutionFailed(format!("unexpected result reading {query}: {e}"))
        })
    }

    fn not_found(query: &ElementQuery) -> BrowserError {
        BrowserError::ElementNotFound {
            query: query.to_string(),
        }
    }

    /// Waits until the query matches an element.
    pub async fn wait_for_selector(
        &self,
        query: impl Into<ElementQuery>,
        timeout: Duration,
    ) -> Result<()> {
        let query: &ElementQuery = &query.into();
        wait_for_result(
            move || self.exists(query),
            WaitConfig::with_timeout(timeout),
            &format!("element {query} to appear"),
        )
        .await
    }

    /// Waits until the query matches a rendered, visible element.
    pub async fn wait_for_visible(
        &self,
        query: impl Into<ElementQuery>,
        timeout: Duration,
    ) -> Result<()> {
        let query: &ElementQuery = &query.into();
        wait_for_result(
            move || self.is_visible(query),
            WaitConfig::with_timeout(timeout),
            &format!("element {query} to be visible"),
        )
        .await
    }

    /// Waits until the element has non-blank text.
    pub async fn wait_for_text(
        &self,
        query: impl Into<ElementQuery>,
        timeout: Duration,
    ) -> Result<()> {
        let query: &ElementQuery = &query.into();
        wait_for_result(
            move || async move {
                let text: Option<String> = self.read(query, scripts::TEXT_CONTENT).await?;
                Ok(text.is_some_and(|t| !t.trim().is_empty()))
            },
            WaitConfig::with_timeout(timeout),
            &format!("element {query} to have text"),
        )
        .await
    }

    pub async fn exists(&self, query: &ElementQuery) -> Result<bool> {
        self.read(query, scripts::EXISTS).await
    }

    /// Raw `textContent` of the element, untrimmed.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` when nothing matches.
    pub async fn text_content(&self, query: impl Into<ElementQuery>) -> Result<String> {
        let query = query.into();
        let text: Option<String> = self.read(&query, scripts::TEXT_CONTENT).await?;
        text.ok_or_else(|| Self::not_found(&query))
    }

    /// Attribute value, `None` when the element lacks the attribute.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` when nothing matches.
    pub async fn attribute(
        &self,
        query: impl Into<ElementQuery>,
        name: &str,
    ) -> Result<Option<String>> {
        let query = query.into();
        let body = scripts::attribute(&js_string(name)?);
        let found: Option<AttributeValue> = self.read(&query, &body).await?;
        found
            .map(|attr| attr.value)
            .ok_or_else(|| Self::not_found(&query))
    }

    /// False when nothing matches.
    pub async fn is_visible(&self, query: &ElementQuery) -> Result<bool> {
        self.read(query, scripts::VISIBLE).await
    }

    /// False when nothing matches.
    pub async fn is_enabled(&self, query: &ElementQuery) -> Result<bool> {
        self.read(query, scripts::ENABLED).await
    }

    /// Number of elements matching a CSS selector.
    pub async fn count(&self, selector: &str) -> Result<usize> {
        let script = format!("document.querySelectorAll({}).length", js_string(selector)?);
        self.evaluate(&script).await
    }

    /// # Errors
    ///
    /// `ElementNotFound` when nothing matches.
    pub async fn bounding_box(&self, query: impl Into<ElementQuery>) -> Result<BoundingBox> {
        let query = query.into();
        let found: Option<BoundingBox> = self.read(&query, scripts::BOUNDING_BOX).await?;
        found.ok_or_else(|| Self::not_found(&query))
    }

    async fn resolve(&self, query: &ElementQuery) -> Result<Element> {
        let root = match query.index() {
            None => self
                .inner
                .find_element(query.selector())
                .await
                .map_err(|_| Self::not_found(query))?,
            Some(i) => self
                .inner
                .find_elements(query.selector())
                .await?
                .into_iter()
                .nth(i)
                .ok_or_else(|| Self::not_found(query))?,
        };

        match query.descendant_selector() {
            None => Ok(root),
            Some(child) => root
                .find_element(child)
                .await
                .map_err(|_| Self::not_found(query)),
        }
    }

    /// Scrolls the element into view and clicks its center.
    ///
    /// # Errors
    ///
    /// `ElementNotFound` when nothing matches.
    pub async fn click(&self, query: impl Into<ElementQuery>) -> Result<()> {
        let query = query.into();
        debug!(%query, "click");
        let element = self.resolve(&query).await?;
        element.click().await?;
        Ok(())
    }

    /// Returns the current page URL.
    pub async fn url(&self) -> Result<String> {
        self.evaluate("window.location.href").await
    }

    pub async fn title(&self) -> Result<String> {
        self.evaluate("document.title").await
    }

    pub async fn go_back(&self) -> Result<()> {
        self.execute("history.back()").await
    }

    /// Waits until `window.location.href` differs from `previous`.
    pub async fn wait_for_url_change(&self, previous: &str, timeout: Duration) -> Result<()> {
        wait_for_result(
            move || async move {
                let current = self.url().await?;
                Ok(current != previous)
            },
            WaitConfig::with_timeout(timeout),
            &format!("URL to change from {previous}"),
        )
        .await
    }

    /// Settles a click that navigates: waits for the URL to move off
    /// `previous_url`, then runs the two-tier load wait.
    pub async fn settle_after_click(&self, previous_url: &str, wait: NavigationWait) -> Result<()> {
        self.wait_for_url_change(previous_url, wait.primary).await?;
        self.wait_for_navigation(wait).await
    }

    /// Fixed delay, for UI effects with no observable completion signal.
    pub async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Arms a wait for the next native dialog.
    ///
    /// Arm before the action that opens the dialog; dialogs delivered
    /// earlier are discarded.
    pub fn expect_dialog(&self) -> Result<DialogExpectation<'_>> {
        self.dialogs.expect()
    }

    /// Dialogs accepted on this page since it was opened.
    pub fn dialogs_seen(&self) -> usize {
        self.dialogs.seen()
    }

    /// Closes the tab.
    ///
    /// The dialog task holds a reference to the tab, so it is stopped first.
    pub async fn close(self) -> Result<()> {
        let Page {
            inner,
            dialogs: _,
            dialog_task,
        } = self;

        dialog_task.abort();
        let _ = dialog_task.await;

        match Arc::try_unwrap(inner) {
            Ok(page) => {
                page.close().await?;
                Ok(())
            }
            Err(_) => {
                warn!("page still referenced at close; leaving it to the browser");
                Ok(())
            }
        }
    }
}
