//! The site under test.
//!
//! Page objects navigate by path; a [`Site`] turns those paths into absolute
//! URLs against a base such as `https://www.demoblaze.com` or a local
//! fixture server.

use shopcheck_config::UiSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    base_url: String,
}

impl Site {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL with exactly one `/` between them.
    ///
    /// ```ignore
    /// Site::new("https://www.demoblaze.com").url("/cart.html") // "https://www.demoblaze.com/cart.html"
    /// ```
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl From<&UiSettings> for Site {
    fn from(settings: &UiSettings) -> Self {
        Site::new(settings.base_url.clone())
    }
}
