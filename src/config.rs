//! Session settings, read from a JSON file.

use crate::builder::DEFAULT_DESIGN_NAME;
use crate::error::Result;
use crate::highlight::DEFAULT_THEME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn default_store_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cloudscape-rad-builder")
}

fn default_design_name() -> String {
    DEFAULT_DESIGN_NAME.to_owned()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_owned()
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory of the saved-design store
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    #[serde(default = "default_design_name")]
    pub design_name: String,
    /// Colour the output of `code`
    #[serde(default = "default_true")]
    pub highlight: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Cap on undo entries; unbounded when absent
    #[serde(default)]
    pub max_history: Option<usize>,
    /// Start fresh sessions with a side navigation in place
    #[serde(default = "default_true")]
    pub seed_navigation: bool,
    /// JSON catalog replacing the builtin one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            design_name: default_design_name(),
            highlight: true,
            theme: default_theme(),
            max_history: None,
            seed_navigation: true,
            catalog_path: None,
        }
    }
}

impl Config {
    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `config.json` inside the default store directory.
    pub fn default_path() -> PathBuf {
        default_store_dir().join("config.json")
    }
}
