//! Cart configuration.

use crate::money::Currency;
use crate::CommerceError;
use munjiz_cache::FileStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage key carts have always been saved under.
pub const DEFAULT_STORAGE_KEY: &str = "@cart_items";

/// Cart configuration file.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Key the cart snapshot is stored under.
    pub storage_key: String,

    /// Display currency code; unknown codes display as USD.
    pub currency: String,

    /// Directory for the file-backed store.
    pub data_dir: Option<PathBuf>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency: Currency::default().code().to_string(),
            data_dir: None,
        }
    }
}

impl CartConfig {
    /// Load config from a TOML file, or JSON if the path ends in `.json`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| {
                CommerceError::Config(format!("failed to parse JSON {}: {e}", path.display()))
            })
        } else {
            toml::from_str(&content).map_err(|e| {
                CommerceError::Config(format!("failed to parse TOML {}: {e}", path.display()))
            })
        }
    }

    /// The display currency.
    pub fn currency(&self) -> Currency {
        Currency::resolve(&self.currency)
    }

    /// Open the file-backed store, if a data directory is configured.
    pub async fn open_file_store(&self) -> Result<Option<FileStore>, CommerceError> {
        match &self.data_dir {
            Some(dir) => Ok(Some(FileStore::open(dir).await?)),
            None => Ok(None),
        }
    }
}
