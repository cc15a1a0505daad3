//! Configuration file loading

use std::path::Path;

use super::{
    ConfigError,
    TranslatorSettings,
};
use crate::plural::PluralRule;
use crate::storage::JsonFileStorage;

/// Name of the configuration file looked up in a project root.
pub const CONFIG_FILE_NAME: &str = ".l10n.json";

/// Read `<root>/.l10n.json`.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parsed
/// - `Ok(None)`: no configuration file
///
/// # Errors
/// - File read error
/// - JSON parse error
fn load_from_dir(root: &Path) -> Result<Option<TranslatorSettings>, ConfigError> {
    let config_path = root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: TranslatorSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

impl TranslatorSettings {
    /// Validated settings of the project at `root`; defaults without a config file.
    ///
    /// # Errors
    /// - File read error
    /// - JSON parse error
    /// - Validation error
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let settings = load_from_dir(root)?.unwrap_or_default();
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        tracing::debug!("Settings loaded: {:?}", settings);
        Ok(settings)
    }

    /// Plural rule and catalog storage for the project at `root`.
    ///
    /// Pass both to `Translator::with_storage` or `Translator::scoped`.
    ///
    /// # Errors
    /// Same as [`TranslatorSettings::load`].
    pub fn open(root: &Path) -> Result<(PluralRule, JsonFileStorage), ConfigError> {
        let settings = Self::load(root)?;
        Ok((settings.resolve_plural_rule(), JsonFileStorage::from_settings(root, &settings)))
    }
}
