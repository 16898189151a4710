//! Front end configuration.
//!
//! ```toml
//! [catalog]
//! max_results = 30
//! hydration_concurrency = 4
//!
//! [display]
//! cover_size = "L"
//! show_progress = false
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::path::{Path, PathBuf};

use bookshelf_search::{CatalogConfig, CoverSize};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Complete front end configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookshelfConfig {
    /// Search pipeline settings.
    pub catalog: CatalogConfig,
    /// Output settings.
    pub display: DisplayConfig,
}

/// How results are shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Cover size used when `--covers` is given without `--size`.
    pub cover_size: CoverSize,
    /// Draw a hydration progress bar on stderr.
    pub show_progress: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cover_size: CoverSize::M,
            show_progress: true,
        }
    }
}

impl BookshelfConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    /// Load the explicit file if given, else the default file if it exists,
    /// else the built-in defaults. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, any file is
    /// malformed, or the resulting catalog settings are invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_config_path();
                if path.is_file() {
                    tracing::debug!(path = %path.display(), "loading default config");
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the catalog settings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.catalog
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Returns the default config file path: `~/.config/bookshelf/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("bookshelf").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("bookshelf")
                .join("config.toml")
        } else {
            PathBuf::from("bookshelf.toml")
        }
    }
}
