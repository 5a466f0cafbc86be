//! Injection settings
//!
//! Priority: environment variables > config file > defaults.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{InjectError, Result};
use crate::format::FormatOptions;
use crate::imports::NamespaceImports;

const CONFIG_FILES: [&str; 2] = ["fob-inject.toml", "fob-inject.json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectConfig {
    /// Package whose import is normalized to a namespace import
    pub framework_package: String,
    /// Local name used when no binding can be found
    pub namespace_name: String,
    /// Directory, next to the output root, holding utility modules
    pub utils_dir: String,
    /// Utility file used when a call names none
    pub utility_file_name: String,
    /// Specifier returned for the default utility file
    pub default_specifier: String,
    /// Return `default_specifier` for the default file regardless of where the consumer lives
    pub pin_default_specifier: bool,
    pub format: FormatOptions,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            framework_package: "vue".to_string(),
            namespace_name: "Vue".to_string(),
            utils_dir: "utils".to_string(),
            utility_file_name: "gogocodeTransfer.js".to_string(),
            default_specifier: "./gogocodeTransfer".to_string(),
            pin_default_specifier: true,
            format: FormatOptions::default(),
        }
    }
}

impl InjectConfig {
    /// Load from `config_path`, or `fob-inject.toml`/`fob-inject.json` in the
    /// working directory, then `FOB_INJECT_*` environment variables
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = config_path.map(Path::to_path_buf).or_else(|| {
            CONFIG_FILES
                .iter()
                .map(PathBuf::from)
                .find(|path| path.exists())
        });

        if let Some(path) = config_file {
            tracing::debug!("Loading inject config from: {}", path.display());
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        figment = figment.merge(Env::prefixed("FOB_INJECT_"));

        figment
            .extract()
            .map_err(|e| InjectError::Config(e.to_string()))
    }

    pub fn namespace_imports(&self) -> NamespaceImports {
        NamespaceImports::new(&self.framework_package, &self.namespace_name)
    }
}
