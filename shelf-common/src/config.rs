//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `SHELF_ROOT` environment variable
//! 3. TOML config file (`shelf/config.toml` under the platform config dir)
//! 4. OS-dependent compiled default (fallback)
//!
//! Missing config files never abort startup; defaults apply with a log line.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::Result;

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "SHELF_ROOT";

/// Optional TOML configuration file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Root folder override
    pub root_folder: Option<PathBuf>,
    /// Base URL of a running shelf-sv instance (used by shelf-cl)
    pub server_url: Option<String>,
    /// Listen host override for shelf-sv
    pub listen_host: Option<String>,
    /// Listen port override for shelf-sv
    pub listen_port: Option<u16>,
}

impl TomlConfig {
    /// Load the config file from the platform config directory, if present.
    ///
    /// A missing file yields defaults; a malformed file is logged and
    /// treated as missing.
    pub fn load() -> Self {
        let Some(path) = Self::config_file_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "Loaded config file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Malformed config file, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable config file, using defaults");
                Self::default()
            }
        }
    }

    /// Platform config file location (`<config dir>/shelf/config.toml`)
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("shelf").join("config.toml"))
    }
}

/// Resolves the root folder for a module following the priority order
pub struct RootFolderResolver {
    module_name: String,
    config: TomlConfig,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            config: TomlConfig::load(),
        }
    }

    /// Resolver over an already-loaded config (avoids a second file read)
    pub fn with_config(module_name: &str, config: TomlConfig) -> Self {
        Self {
            module_name: module_name.to_string(),
            config,
        }
    }

    /// Resolve the root folder with no command-line override
    pub fn resolve(&self) -> PathBuf {
        self.resolve_with_cli(None)
    }

    /// Resolve the root folder, honoring a command-line argument first
    pub fn resolve_with_cli(&self, cli_arg: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_arg {
            info!(module = %self.module_name, path = %path.display(), "Root folder from command line");
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
            info!(module = %self.module_name, path = %path, "Root folder from {}", ROOT_ENV_VAR);
            return PathBuf::from(path);
        }

        if let Some(path) = &self.config.root_folder {
            info!(module = %self.module_name, path = %path.display(), "Root folder from config file");
            return path.clone();
        }

        let default = default_root_folder();
        info!(module = %self.module_name, path = %default.display(), "Root folder from platform default");
        default
    }
}

/// Creates the root folder and derives the well-known file paths inside it
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root folder (and parents) if it does not exist
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Path of the SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root.join("shelf.db")
    }

    /// Path of the JSON shelf file inside the root folder
    pub fn shelf_path(&self) -> PathBuf {
        self.root.join("shelf.json")
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("shelf"))
        .unwrap_or_else(|| PathBuf::from("./shelf_data"))
}
