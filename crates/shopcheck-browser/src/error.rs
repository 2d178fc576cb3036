//! Error types for browser operations.
//!
//! Failure modes are kept apart so a test report says what went wrong:
//! the browser never started, a navigation failed, a wait ran out of time,
//! an element was missing, or a page script threw.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    /// Failed to launch the browser process.
    ///
    /// This typically occurs when Chrome/Chromium is not installed,
    /// or when there are permission issues with the executable.
    #[error("failed to launch browser: {reason}")]
    LaunchFailed {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("CDP connection failed: {0}")]
    ConnectionFailed(String),

    #[error("navigation to '{url}' failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    /// A wait condition was not satisfied within the timeout.
    ///
    /// Element waits, load-state waits, URL-change waits and dialog waits all
    /// end here.
    #[error("wait condition '{condition}' timed out after {timeout:?}")]
    WaitTimeout {
        condition: String,
        timeout: Duration,
    },

    #[error("no element matches {query}")]
    ElementNotFound { query: String },

    #[error("JavaScript execution failed: {0}")]
    ScriptExecutionFailed(String),

    #[error("browser instance is already closed")]
    AlreadyClosed,

    #[error("a dialog expectation is already armed on this page")]
    DialogAlreadyArmed,

    #[error("chromiumoxide error: {0}")]
    ChromiumOxide(#[from] chromiumoxide::error::CdpError),
}

impl BrowserError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::WaitTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, BrowserError>;
