//! l10n-translator
//!
//! In-memory translation catalog for one locale: plural-aware lookup,
//! printf-style formatting, tracking of keys that have no translation yet,
//! and pluggable persistence.
//!
//! ```
//! use std::sync::Arc;
//!
//! use l10n_translator::{MemoryStorage, PluralRule, Translator, TranslatorError};
//!
//! let mut storage = MemoryStorage::new();
//! let text = Translator::scoped(Arc::new(PluralRule::Czech), &mut storage, |translator| {
//!     translator.set_text("files", "%d soubory", 1)?;
//!     translator.translate("files", Some(3), &[])
//! })?;
//!
//! assert_eq!(text, "3 soubory");
//! assert_eq!(storage.save_count(), 1);
//! # Ok::<(), TranslatorError>(())
//! ```

pub mod config;
mod error;
pub mod format;
pub mod plural;
pub mod storage;
mod translator;

#[cfg(test)]
mod test_utils;

pub use error::TranslatorError;
pub use format::{
    FormatArg,
    FormatError,
};
pub use plural::{
    Plural,
    PluralRule,
};
pub use storage::{
    CatalogDocument,
    JsonFileStorage,
    MemoryStorage,
    Storage,
    StorageError,
};
pub use translator::{
    PluralForms,
    Translations,
    Translator,
    Untranslated,
    UntranslatedMarkers,
};
