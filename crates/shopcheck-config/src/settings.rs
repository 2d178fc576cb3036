//! Typed settings shared by the API and UI suites.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Root settings object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub retry: RetrySettings,
}

/// The product/cart JSON service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

/// The demo storefront and the browser that drives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default = "default_ui_base_url")]
    pub base_url: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default)]
    pub browser: BrowserKind,

    /// Element waits, in milliseconds.
    #[serde(default = "default_ui_timeout_ms")]
    pub default_timeout_ms: u64,

    /// First tier of the navigation wait (DOM content loaded).
    #[serde(default = "default_ui_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Second tier of the navigation wait (full load).
    #[serde(default = "default_fallback_timeout_ms")]
    pub fallback_timeout_ms: u64,

    /// Pause after a dialog-triggering action.
    #[serde(default = "default_dialog_settle_ms")]
    pub dialog_settle_ms: u64,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    #[serde(default = "default_true")]
    pub ignore_https_errors: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

/// Declared for parity with the suite's settings surface; nothing retries on these yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_retry_attempts")]
    pub attempts: u32,

    #[serde(default = "default_retry_delay_secs")]
    pub delay_secs: u64,
}

pub fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

pub fn default_api_timeout_secs() -> u64 {
    10
}

pub fn default_ui_base_url() -> String {
    "https://www.demoblaze.com".to_string()
}

pub fn default_ui_timeout_ms() -> u64 {
    10_000
}

pub fn default_fallback_timeout_ms() -> u64 {
    5_000
}

pub fn default_dialog_settle_ms() -> u64 {
    1_000
}

pub fn default_window_width() -> u32 {
    1280
}

pub fn default_window_height() -> u32 {
    720
}

pub fn default_retry_attempts() -> u32 {
    3
}

pub fn default_retry_delay_secs() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_api_timeout_secs(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            base_url: default_ui_base_url(),
            headless: true,
            browser: BrowserKind::default(),
            default_timeout_ms: default_ui_timeout_ms(),
            navigation_timeout_ms: default_ui_timeout_ms(),
            fallback_timeout_ms: default_fallback_timeout_ms(),
            dialog_settle_ms: default_dialog_settle_ms(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            ignore_https_errors: true,
            chrome_path: None,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: default_retry_attempts(),
            delay_secs: default_retry_delay_secs(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl UiSettings {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }

    pub fn dialog_settle(&self) -> Duration {
        Duration::from_millis(self.dialog_settle_ms)
    }
}

impl RetrySettings {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl Settings {
    /// Rejects values that would make every test fail for a configuration reason.
    pub fn validate(&self) -> Result<()> {
        validate_base_url("api.base_url", &self.api.base_url)?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::invalid("api.timeout_secs", "must be greater than zero"));
        }

        self.ui.validate()
    }
}

impl UiSettings {
    /// The browser half of [`Settings::validate`], for callers that build
    /// `UiSettings` by hand.
    pub fn validate(&self) -> Result<()> {
        validate_base_url("ui.base_url", &self.base_url)?;

        for (field, value) in [
            ("ui.default_timeout_ms", self.default_timeout_ms),
            ("ui.navigation_timeout_ms", self.navigation_timeout_ms),
            ("ui.fallback_timeout_ms", self.fallback_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be greater than zero"));
            }
        }

        if self.browser != BrowserKind::Chromium {
            return Err(ConfigError::invalid(
                "ui.browser",
                format!(
                    "{:?} is not supported; the suite drives Chromium over CDP",
                    self.browser
                ),
            ));
        }

        Ok(())
    }
}

fn validate_base_url(field: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::invalid(
            field,
            format!("'{url}' must start with http:// or https://"),
        ));
    }
    Ok(())
}
