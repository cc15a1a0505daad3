//! Project configuration (`.l10n.json`)
/// Config file loading
mod loader;
/// Configuration types and settings
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use types::{
    ConfigError,
    StorageConfig,
    TranslatorSettings,
    ValidationError,
};
