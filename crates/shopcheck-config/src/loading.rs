use std::path::Path;

use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::settings::Settings;

/// Looked up in the current directory when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "shopcheck.toml";

/// Prefix for nested overrides, e.g. `SHOPCHECK_UI__HEADLESS=false`.
pub const ENV_PREFIX: &str = "SHOPCHECK_";

impl Settings {
    /// Load settings from every source.
    /// Priority: BASE_URL/API_BASE_URL > SHOPCHECK_* env > config file > defaults
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Same as [`Settings::load`], reading the config file from `config_path`
    /// instead of `./shopcheck.toml`.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let settings: Settings = Self::figment(config_path)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))?;

        settings.validate()?;
        debug!(
            api = %settings.api.base_url,
            ui = %settings.ui.base_url,
            headless = settings.ui.headless,
            "loaded settings"
        );
        Ok(settings)
    }

    /// The merged provider stack, exposed so callers can layer their own sources.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        let config_file = config_path.map(Path::to_path_buf).or_else(|| {
            let default_path = Path::new(CONFIG_FILE_NAME);
            default_path.exists().then(|| default_path.to_path_buf())
        });

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        // The JSON service URL keeps its conventional unprefixed names.
        figment
            .merge(Env::raw().only(&["BASE_URL"]).map(|_| "api.base_url".into()))
            .merge(Env::raw().only(&["API_BASE_URL"]).map(|_| "api.base_url".into()))
    }
}
