//! Plugin discovery settings for the CLI.
//!
//! | Variable | Effect |
//! |---|---|
//! | `VIDTOOLZ_PLUGIN_MANIFEST` | manifest path (default `<config dir>/vidtoolz/plugins.json`) |
//! | `VIDTOOLZ_NO_EXTERNAL_PLUGINS` | `1`/`true` loads built-in providers only |

use std::ffi::OsString;
use std::path::PathBuf;

use vidtoolz_core::config::{get_env_bool, get_env_path};

/// Prefix of plugin executables found on `PATH` (`vidtoolz-gif` adds `gif`).
pub const PLUGIN_EXECUTABLE_PREFIX: &str = "vidtoolz-";

/// File name of the manifest inside the config directory.
pub const MANIFEST_FILE_NAME: &str = "plugins.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Manifest listing installed plugin packages
    pub manifest_path: Option<PathBuf>,
    /// Prefix identifying plugin executables
    pub executable_prefix: String,
    /// Directories searched for plugin executables (process `PATH` if unset)
    pub search_path: Option<OsString>,
    /// When false only built-in providers are loaded
    pub external_enabled: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            executable_prefix: PLUGIN_EXECUTABLE_PREFIX.to_string(),
            search_path: None,
            external_enabled: true,
        }
    }
}

impl DiscoveryConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            manifest_path: get_env_path("VIDTOOLZ_PLUGIN_MANIFEST").or(defaults.manifest_path),
            external_enabled: !get_env_bool("VIDTOOLZ_NO_EXTERNAL_PLUGINS", false),
            ..defaults
        }
    }

    /// `PATH` entries searched for plugin executables.
    #[must_use]
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let path = self
            .search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))
            .unwrap_or_default();
        std::env::split_paths(&path).collect()
    }
}

/// `<config dir>/vidtoolz/plugins.json`, when the platform has a config dir.
#[must_use]
pub fn default_manifest_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vidtoolz").join(MANIFEST_FILE_NAME))
}
