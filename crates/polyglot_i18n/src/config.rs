//! Store configuration, read from TOML.
//!
//! ```toml
//! default_language = "en"
//!
//! [[catalogs]]
//! path = "locales/app.yaml"
//!
//! [[catalogs]]
//! path = "locales/overrides.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::store::{TranslationStore, DEFAULT_LANGUAGE};
use crate::tree::Translations;
use crate::I18nError;

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct I18nConfig {
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Dictionary files, merged in order (later files win).
    #[serde(default)]
    pub catalogs: Vec<CatalogSource>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            catalogs: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSource {
    pub path: PathBuf,
}

/// Dictionary file format, picked from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl I18nConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, I18nError> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, I18nError> {
        let path = path.as_ref();
        let src = read_file(path)?;
        let mut config = Self::from_toml_str(&src)?;

        // Catalog paths are relative to the config file.
        if let Some(dir) = path.parent() {
            for catalog in &mut config.catalogs {
                if catalog.path.is_relative() {
                    catalog.path = dir.join(&catalog.path);
                }
            }
        }
        Ok(config)
    }

    /// Read and merge every configured catalog.
    pub fn load_translations(&self) -> Result<Translations, I18nError> {
        let mut merged = Translations::new();
        for source in &self.catalogs {
            merged.merge(source.load()?);
        }
        Ok(merged)
    }
}

impl CatalogSource {
    pub fn load(&self) -> Result<Translations, I18nError> {
        let format = CatalogFormat::from_path(&self.path)
            .ok_or_else(|| I18nError::UnsupportedFormat(self.path.clone()))?;
        let src = read_file(&self.path)?;
        debug!(path = %self.path.display(), ?format, "loading translation catalog");

        match format {
            #[cfg(feature = "yaml")]
            CatalogFormat::Yaml => Translations::from_yaml_str(&src),
            #[cfg(feature = "json")]
            CatalogFormat::Json => Translations::from_json_str(&src),
            #[allow(unreachable_patterns)]
            _ => Err(I18nError::UnsupportedFormat(self.path.clone())),
        }
    }
}

fn read_file(path: &Path) -> Result<String, I18nError> {
    fs::read_to_string(path).map_err(|source| I18nError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl TranslationStore {
    /// Build a store from configuration.
    ///
    /// The dictionary goes through
    /// [`set_default_translations`](TranslationStore::set_default_translations),
    /// so nothing is notified on a fresh store.
    pub fn from_config(config: &I18nConfig) -> Result<Self, I18nError> {
        let translations = config.load_translations()?;
        let store = Self::with_language(config.default_language.clone());
        store.set_default_translations(translations);
        Ok(store)
    }
}
