//! Element addressing for page scripts.
//!
//! An [`ElementQuery`] names one element: the first match of a CSS selector,
//! optionally the Nth match instead, optionally narrowed to a descendant of
//! that match. Page objects use it to read "the title of card 3" without
//! holding element handles across awaits.
//!
//! Selectors are embedded with JSON string escaping, so a selector can never
//! break out of the generated script.

use std::fmt;

use crate::error::{BrowserError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementQuery {
    selector: String,
    nth: Option<usize>,
    descendant: Option<String>,
}

impl ElementQuery {
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            nth: None,
            descendant: None,
        }
    }

    /// Select the `index`-th (zero-based) match instead of the first.
    #[must_use]
    pub fn nth(mut self, index: usize) -> Self {
        self.nth = Some(index);
        self
    }

    /// Narrow to the first element matching `selector` inside the current match.
    #[must_use]
    pub fn descendant(mut self, selector: impl Into<String>) -> Self {
        self.descendant = Some(selector.into());
        self
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn index(&self) -> Option<usize> {
        self.nth
    }

    pub fn descendant_selector(&self) -> Option<&str> {
        self.descendant.as_deref()
    }

    /// A JavaScript expression evaluating to the element or `null`.
    pub fn to_js(&self) -> Result<String> {
        let selector = js_string(&self.selector)?;

        let root = match self.nth {
            None => format!("document.querySelector({selector})"),
            Some(i) => format!("(document.querySelectorAll({selector})[{i}] || null)"),
        };

        match &self.descendant {
            None => Ok(root),
            Some(child) => {
                let child = js_string(child)?;
                Ok(format!(
                    "((__root) => __root ? __root.querySelector({child}) : null)({root})"
                ))
            }
        }
    }

    /// Wrap `body` so it runs with the resolved element bound to `el`
    /// (possibly `null`) and its result comes back as a JSON string.
    ///
    /// Returning JSON text keeps `null` and objects intact across the CDP
    /// boundary; callers decode it with `serde_json`.
    pub fn script(&self, body: &str) -> Result<String> {
        Ok(format!(
            "JSON.stringify(((el) => {{ {body} }})({}))",
            self.to_js()?
        ))
    }
}

impl From<&str> for ElementQuery {
    fn from(selector: &str) -> Self {
        ElementQuery::css(selector)
    }
}

impl From<String> for ElementQuery {
    fn from(selector: String) -> Self {
        ElementQuery::css(selector)
    }
}

impl From<&ElementQuery> for ElementQuery {
    fn from(query: &ElementQuery) -> Self {
        query.clone()
    }
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.selector)?;
        if let Some(i) = self.nth {
            write!(f, "[{i}]")?;
        }
        if let Some(child) = &self.descendant {
            write!(f, " >> '{child}'")?;
        }
        Ok(())
    }
}

/// Quote `value` as a JavaScript string literal.
pub(crate) fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))
}

/// Element reads shared by every page, as script bodies for [`ElementQuery::script`].
pub(crate) mod scripts {
    pub const EXISTS: &str = "return el !== null;";

    pub const TEXT_CONTENT: &str = "return el ? el.textContent : null;";

    pub const VISIBLE: &str = "if (!el) return false; \
        const style = window.getComputedStyle(el); \
        if (style.visibility === 'hidden' || style.display === 'none') return false; \
        return !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);";

    pub const ENABLED: &str = "return !!el && !el.disabled && el.getAttribute('aria-disabled') !== 'true';";

    pub const BOUNDING_BOX: &str = "if (!el) return null; \
        const r = el.getBoundingClientRect(); \
        return { x: r.x, y: r.y, width: r.width, height: r.height };";

    /// Wrapped in an object so a missing attribute (`value: null`) stays
    /// distinct from a missing element (`null`).
    pub fn attribute(name_literal: &str) -> String {
        format!("return el ? {{ value: el.getAttribute({name_literal}) }} : null;")
    }
}
