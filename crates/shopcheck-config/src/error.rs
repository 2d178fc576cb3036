//! Error types for configuration loading and validation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be merged or extracted (bad TOML, wrong type in env).
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid value for '{field}': {hint}")]
    InvalidValue { field: String, hint: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, hint: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            hint: hint.into(),
        }
    }
}
