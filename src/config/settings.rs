use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Timing;
use crate::error::CartError;

/// Project config file, looked up in the current directory
pub const PROJECT_CONFIG_FILE: &str = ".course-cart.toml";

/// Global config file, relative to `$HOME`
pub const GLOBAL_CONFIG_FILE: &str = ".course-cart/config.toml";

/// Storefront configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Symbol printed before non-zero amounts
    pub currency_symbol: String,

    /// SQLite database holding persisted carts
    pub storage_path: Option<PathBuf>,

    /// TOML catalog replacing the built-in courses
    pub catalog_path: Option<PathBuf>,

    pub timing: Timing,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            storage_path: None,
            catalog_path: None,
            timing: Timing::default(),
        }
    }
}

/// One config file; unset fields fall through to lower layers
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    currency_symbol: Option<String>,
    storage_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
    #[serde(default)]
    timing: TimingLayer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimingLayer {
    toast_ms: Option<u64>,
    purchase_toast_ms: Option<u64>,
    success_close_ms: Option<u64>,
}

impl CartConfig {
    /// Load configuration with precedence:
    /// explicit file > project file > global file > defaults.
    ///
    /// An explicit file must exist; the project and global files are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CartError> {
        let mut config = Self::default();

        if let Some(home) = std::env::var_os("HOME") {
            let global = PathBuf::from(home).join(GLOBAL_CONFIG_FILE);
            if global.is_file() {
                config.apply(read_layer(&global)?);
            }
        }

        let project = PathBuf::from(PROJECT_CONFIG_FILE);
        if project.is_file() {
            config.apply(read_layer(&project)?);
        }

        if let Some(path) = explicit {
            config.apply(read_layer(path)?);
        }

        Ok(config)
    }

    /// Parse a single TOML document over the defaults.
    pub fn from_toml(raw: &str) -> Result<Self, CartError> {
        let mut config = Self::default();
        config.apply(parse_layer(raw)?);
        Ok(config)
    }

    fn apply(&mut self, layer: ConfigLayer) {
        if let Some(symbol) = layer.currency_symbol {
            self.currency_symbol = symbol;
        }
        if layer.storage_path.is_some() {
            self.storage_path = layer.storage_path;
        }
        if layer.catalog_path.is_some() {
            self.catalog_path = layer.catalog_path;
        }
        if let Some(ms) = layer.timing.toast_ms {
            self.timing.toast_ms = ms;
        }
        if let Some(ms) = layer.timing.purchase_toast_ms {
            self.timing.purchase_toast_ms = ms;
        }
        if let Some(ms) = layer.timing.success_close_ms {
            self.timing.success_close_ms = ms;
        }
    }
}

fn read_layer(path: &Path) -> Result<ConfigLayer, CartError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        CartError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;
    let layer = parse_layer(&raw)
        .map_err(|e| CartError::Config(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "loaded config file");
    Ok(layer)
}

fn parse_layer(raw: &str) -> Result<ConfigLayer, CartError> {
    toml::from_str(raw).map_err(|e| CartError::Config(format!("invalid config: {}", e)))
}
