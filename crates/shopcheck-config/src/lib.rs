//! Configuration for the shopcheck suites.
//!
//! Settings come from layered sources: built-in defaults, an optional
//! `shopcheck.toml`, `SHOPCHECK_`-prefixed environment variables, and the
//! conventional `BASE_URL` / `API_BASE_URL` overrides for the JSON service.

pub mod error;
pub mod loading;
pub mod logger;
pub mod settings;

pub use error::{ConfigError, Result};
pub use loading::CONFIG_FILE_NAME;
pub use settings::{ApiSettings, BrowserKind, RetrySettings, Settings, UiSettings};
