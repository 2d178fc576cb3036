//! Error types for page-object operations.

use shopcheck_browser::BrowserError;
use shopcheck_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// A page rendered, but not the way the storefront contract says it should.
    #[error("{page} page: {reason}")]
    Validation { page: &'static str, reason: String },

    #[error("expected a dialog containing '{expected}', got '{actual}'")]
    UnexpectedDialog { expected: String, actual: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PageError {
    pub(crate) fn validation(page: &'static str, reason: impl Into<String>) -> Self {
        PageError::Validation {
            page,
            reason: reason.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PageError::Browser(err) if err.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn validation_message_names_the_page() {
        let err = PageError::validation("home", "product 2 price doesn't contain $");
        assert_eq!(err.to_string(), "home page: product 2 price doesn't contain $");
    }

    #[test]
    fn browser_timeouts_are_visible_through_page_errors() {
        let err = PageError::from(BrowserError::WaitTimeout {
            condition: "element '.name' to have text".into(),
            timeout: Duration::from_secs(1),
        });
        assert!(err.is_timeout());
        assert!(!PageError::validation("cart", "empty").is_timeout());
    }
}
