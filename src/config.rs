//! Filter settings and how they are loaded.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

pub const ENV_PREFIX: &str = "DIVELOG_FILTER_";

/// User preferences that change how filters compare strings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Compare buddy and divemaster names case-sensitively.
    pub buddy_case_sensitive: bool,
    /// Match the full-text filter case-sensitively.
    pub fulltext_case_sensitive: bool,
    /// Let the full-text filter also search dive notes.
    pub fulltext_include_notes: bool,
}

impl FilterSettings {
    /// Layer defaults, an optional TOML file and `DIVELOG_FILTER_*` variables.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, FilterError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let settings: Self = figment.extract()?;
        tracing::debug!(?settings, "loaded filter settings");
        Ok(settings)
    }
}

/// FFI entry point for [`FilterSettings::load_from`].
pub fn load_settings(path: Option<String>) -> Result<FilterSettings, FilterError> {
    FilterSettings::load_from(path.as_deref().map(Path::new))
}

pub fn default_settings() -> FilterSettings {
    FilterSettings::default()
}
