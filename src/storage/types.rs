use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::error::TranslatorError;
use crate::translator::{
    PluralForms,
    Translator,
    UntranslatedMarkers,
};

/// Durable storage for a translator's catalog.
///
/// A translator calls [`load`](Storage::load) once when it is created and
/// [`save`](Storage::save) once when its scope ends. `save_one` and `delete`
/// are issued immediately by `Translator::save_text` and
/// `Translator::remove_text`/`remove_forms`. Errors are returned to the
/// translator's caller unchanged.
pub trait Storage: fmt::Debug {
    /// Populate `translator` from storage, typically through `set_text`.
    ///
    /// # Errors
    /// Backend specific.
    fn load(&mut self, translator: &mut Translator<'_>) -> Result<(), StorageError>;

    /// Persist the translator's full state.
    ///
    /// # Errors
    /// Backend specific.
    fn save(&mut self, translator: &Translator<'_>) -> Result<(), StorageError>;

    /// Persist one (key, plural) entry.
    ///
    /// # Errors
    /// Backend specific.
    fn save_one(&mut self, key: &str, text: &str, plural: usize) -> Result<(), StorageError>;

    /// Remove one plural form of `key`, or every form when `plural` is `None`.
    ///
    /// # Errors
    /// Backend specific.
    fn delete(&mut self, key: &str, plural: Option<usize>) -> Result<(), StorageError>;
}

/// Defines errors that may occur in storage backends
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Failed to access translation file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The backing file is not valid catalog JSON
    #[error("Invalid JSON in translation file '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The stored data was rejected by the translator (e.g. a plural index out of range)
    #[error("Invalid translation data in '{origin}': {message}")]
    InvalidData { origin: String, message: String },
    /// Error from a third-party backend
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Serializable snapshot of a translator's catalog.
///
/// ```json
/// {
///   "translated": { "items": { "0": "%d item", "1": "%d items" } },
///   "untranslated": { "apple": { "0": false } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogDocument {
    /// key -> plural index -> text
    pub translated: BTreeMap<String, PluralForms>,
    /// key -> plural index -> "probably exists in storage"
    pub untranslated: BTreeMap<String, UntranslatedMarkers>,
}

impl CatalogDocument {
    /// Snapshot the translator's current state.
    #[must_use]
    pub fn from_translator(translator: &Translator<'_>) -> Self {
        Self {
            translated: translator
                .translated()
                .iter()
                .map(|(key, forms)| (key.clone(), forms.clone()))
                .collect(),
            untranslated: translator
                .untranslated()
                .iter()
                .map(|(key, markers)| (key.clone(), markers.clone()))
                .collect(),
        }
    }

    /// Feed the document into `translator`.
    ///
    /// Markers are applied before texts so a document listing the same pair
    /// in both sections ends up translated.
    ///
    /// # Errors
    /// [`StorageError::InvalidData`] when the translator rejects an entry.
    pub fn apply_to(
        &self,
        translator: &mut Translator<'_>,
        origin: &str,
    ) -> Result<(), StorageError> {
        let invalid = |error: TranslatorError| StorageError::InvalidData {
            origin: origin.to_string(),
            message: error.to_string(),
        };

        for (key, markers) in &self.untranslated {
            for (&plural, &probably_exists_in_storage) in markers {
                translator
                    .set_untranslated(key, plural, probably_exists_in_storage)
                    .map_err(invalid)?;
            }
        }

        for (key, forms) in &self.translated {
            for (&plural, text) in forms {
                translator.set_text(key, text.clone(), plural).map_err(invalid)?;
            }
        }

        Ok(())
    }

    /// Insert or replace one translated entry, dropping its marker.
    pub fn set_one(&mut self, key: &str, text: &str, plural: usize) {
        self.translated.entry(key.to_string()).or_default().insert(plural, text.to_string());
        remove_entry(&mut self.untranslated, key, Some(plural));
    }

    /// Remove one plural form of `key`, or the whole key, from both sections.
    pub fn remove(&mut self, key: &str, plural: Option<usize>) {
        remove_entry(&mut self.translated, key, plural);
        remove_entry(&mut self.untranslated, key, plural);
    }

    /// Number of (key, plural) texts in the document.
    #[must_use]
    pub fn text_count(&self) -> usize {
        self.translated.values().map(BTreeMap::len).sum()
    }
}

/// Remove `key`'s `plural` entry (or all of them), dropping the key once empty.
fn remove_entry<V>(
    map: &mut BTreeMap<String, BTreeMap<usize, V>>,
    key: &str,
    plural: Option<usize>,
) {
    let Some(plural) = plural else {
        map.remove(key);
        return;
    };
    if let Some(inner) = map.get_mut(key) {
        inner.remove(&plural);
        if inner.is_empty() {
            map.remove(key);
        }
    }
}
