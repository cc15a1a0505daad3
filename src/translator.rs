//! In-memory translation catalog for one locale.
//!
//! # Invariants
//!
//! 1. **Exclusive states**: a (key, plural) pair is either translated,
//!    marked untranslated, or absent. Storing or successfully reading a text
//!    removes the pair's untranslated marker, and a pair that has a text is
//!    never marked.
//!
//! 2. **Plural range**: every operation taking a plural index rejects
//!    `index >= plurals_count()` with [`TranslatorError::PluralOutOfRange`]
//!    before touching any state.
//!
//! 3. **Upgrade-only markers**: a marker flagged "probably exists in
//!    storage" keeps that flag until the marker is removed.
//!
//! # Lifecycle
//!
//! A translator created with [`Translator::with_storage`] loads the catalog
//! right away. The final save happens in [`Translator::close`], or
//! automatically at the end of [`Translator::scoped`]. Dropping a translator
//! that still holds its storage does not save; it logs a warning.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | No text for (key, plural) | `get_text` returns `None`, `translate` returns the key |
//! | Plural out of range | Index ≥ plural count | `PluralOutOfRange`, state untouched |
//! | No storage | `save_text`/`remove_*`/`save` without storage | `StorageNotConfigured`, state untouched |
//! | Storage failure | Backend error | Returned unchanged as `TranslatorError::Storage` |
//! | Bad template | Too few parameters, unknown `%` conversion | `TranslatorError::Format` |

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::sync::Arc;

use crate::error::TranslatorError;
use crate::format::{
    FormatArg,
    sprintf,
};
use crate::plural::Plural;
use crate::storage::Storage;

/// plural index -> text
pub type PluralForms = BTreeMap<usize, String>;
/// key -> plural forms
pub type Translations = HashMap<String, PluralForms>;
/// plural index -> "probably exists in storage"
pub type UntranslatedMarkers = BTreeMap<usize, bool>;
/// key -> untranslated markers
pub type Untranslated = HashMap<String, UntranslatedMarkers>;

/// Translation catalog for one locale.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use l10n_translator::{FormatArg, PluralRule, Translator};
///
/// let mut translator = Translator::new(Arc::new(PluralRule::English));
/// translator.set_text("items", "%d item", 0).unwrap();
/// translator.set_text("items", "%d items", 1).unwrap();
///
/// assert_eq!(translator.translate("items", Some(1), &[]).unwrap(), "1 item");
/// assert_eq!(translator.translate("items", Some(5), &[]).unwrap(), "5 items");
///
/// // Missing keys fall back to the key itself and are remembered.
/// let greeting = translator.translate("Hello, %s!", None, &[FormatArg::from("Ann")]).unwrap();
/// assert_eq!(greeting, "Hello, Ann!");
/// assert_eq!(translator.untranslated_keys(), vec!["Hello, %s!"]);
/// ```
#[derive(Debug)]
pub struct Translator<'s> {
    /// Plural strategy of the locale
    plural: Arc<dyn Plural>,
    /// Backend, borrowed for the translator's lifetime
    storage: Option<&'s mut dyn Storage>,
    /// Known texts
    translated: Translations,
    /// Lookup misses
    untranslated: Untranslated,
}

impl<'s> Translator<'s> {
    /// Create an empty translator without storage.
    #[must_use]
    pub fn new(plural: Arc<dyn Plural>) -> Self {
        Self { plural, storage: None, translated: HashMap::new(), untranslated: HashMap::new() }
    }

    /// Create a translator and load its catalog from `storage`.
    ///
    /// # Errors
    /// Whatever `storage.load` returns.
    pub fn with_storage(
        plural: Arc<dyn Plural>,
        storage: &'s mut dyn Storage,
    ) -> Result<Self, TranslatorError> {
        let mut translator = Self::new(plural);
        storage.load(&mut translator)?;
        tracing::debug!(
            keys = translator.translated.len(),
            untranslated = translator.untranslated.len(),
            "Loaded translations"
        );
        translator.storage = Some(storage);
        Ok(translator)
    }

    /// Run `f` with a translator loaded from `storage`, then save.
    ///
    /// The final save runs on every exit path of `f`, including an early
    /// `?` return. When both `f` and the save fail, `f`'s error is returned
    /// and the save error is logged.
    ///
    /// # Errors
    /// Load errors, `f`'s error, or the final save error.
    pub fn scoped<R, E, F>(
        plural: Arc<dyn Plural>,
        storage: &'s mut dyn Storage,
        f: F,
    ) -> Result<R, E>
    where
        F: FnOnce(&mut Self) -> Result<R, E>,
        E: From<TranslatorError>,
    {
        let mut translator = Self::with_storage(plural, storage)?;
        let outcome = f(&mut translator);
        let saved = translator.close();

        match (outcome, saved) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(error)) => Err(error.into()),
            (Err(error), Ok(())) => Err(error),
            (Err(error), Err(save_error)) => {
                tracing::warn!(error = %save_error, "Final save failed after an earlier error");
                Err(error)
            }
        }
    }

    /// Save the full state and release the storage.
    ///
    /// Without storage this is a no-op.
    ///
    /// # Errors
    /// Whatever `storage.save` returns.
    pub fn close(mut self) -> Result<(), TranslatorError> {
        let Some(storage) = self.storage.take() else {
            return Ok(());
        };
        tracing::debug!(keys = self.translated.len(), "Saving translations on close");
        storage.save(&self)?;
        Ok(())
    }

    /// Push the full state to storage now.
    ///
    /// # Errors
    /// `StorageNotConfigured`, or whatever `storage.save` returns.
    pub fn save(&mut self) -> Result<(), TranslatorError> {
        let storage = self.storage.take().ok_or(TranslatorError::StorageNotConfigured)?;
        let result = storage.save(self);
        self.storage = Some(storage);
        Ok(result?)
    }

    /// The plural strategy.
    #[must_use]
    pub const fn plural(&self) -> &Arc<dyn Plural> {
        &self.plural
    }

    /// Whether a storage backend is attached.
    #[must_use]
    pub const fn has_storage(&self) -> bool {
        self.storage.is_some()
    }

    /// Reject plural indices the strategy does not know.
    fn check_plural(&self, plural: usize) -> Result<(), TranslatorError> {
        let max = self.plural.plurals_count().saturating_sub(1);
        if plural > max {
            return Err(TranslatorError::PluralOutOfRange { plural, max });
        }
        Ok(())
    }

    /// The attached storage, or `StorageNotConfigured`.
    fn storage_mut(&mut self) -> Result<&mut (dyn Storage + 's), TranslatorError> {
        self.storage.as_deref_mut().ok_or(TranslatorError::StorageNotConfigured)
    }

    /// Whether (key, plural) has a text.
    fn is_translated(&self, key: &str, plural: usize) -> bool {
        self.translated.get(key).is_some_and(|forms| forms.contains_key(&plural))
    }

    /// Store `text` for (key, plural) in memory.
    ///
    /// # Errors
    /// `PluralOutOfRange`.
    pub fn set_text(
        &mut self,
        key: &str,
        text: impl Into<String>,
        plural: usize,
    ) -> Result<(), TranslatorError> {
        self.check_plural(plural)?;
        self.translated.entry(key.to_string()).or_default().insert(plural, text.into());
        self.clear_marker(key, plural);
        Ok(())
    }

    /// Store `text` for (key, plural) and write it through to storage.
    ///
    /// # Errors
    /// `StorageNotConfigured`, `PluralOutOfRange`, or the storage error.
    pub fn save_text(&mut self, key: &str, text: &str, plural: usize) -> Result<(), TranslatorError> {
        self.storage_mut()?;
        self.set_text(key, text, plural)?;
        self.storage_mut()?.save_one(key, text, plural)?;
        Ok(())
    }

    /// Text for (key, plural), clearing its marker when found.
    ///
    /// # Errors
    /// `PluralOutOfRange`.
    pub fn get_text(&mut self, key: &str, plural: usize) -> Result<Option<&str>, TranslatorError> {
        self.check_plural(plural)?;
        // Unreachable while the states stay exclusive; a miss must keep its marker.
        if self.is_translated(key, plural) {
            self.clear_marker(key, plural);
        }
        Ok(self.translated.get(key).and_then(|forms| forms.get(&plural)).map(String::as_str))
    }

    /// Every plural form of `key`, clearing all of the key's markers when found.
    pub fn get_forms(&mut self, key: &str) -> Option<&PluralForms> {
        if !self.translated.contains_key(key) {
            return None;
        }
        self.untranslated.remove(key);
        self.translated.get(key)
    }

    /// Remove one plural form of `key` and delete it from storage.
    ///
    /// # Errors
    /// `PluralOutOfRange`, `StorageNotConfigured`, or the storage error.
    pub fn remove_text(&mut self, key: &str, plural: usize) -> Result<(), TranslatorError> {
        self.check_plural(plural)?;
        self.storage_mut()?;
        if let Some(forms) = self.translated.get_mut(key) {
            forms.remove(&plural);
            if forms.is_empty() {
                self.translated.remove(key);
            }
        }
        self.clear_marker(key, plural);
        self.storage_mut()?.delete(key, Some(plural))?;
        Ok(())
    }

    /// Remove every plural form of `key` and delete the key from storage.
    ///
    /// # Errors
    /// `StorageNotConfigured`, or the storage error.
    pub fn remove_forms(&mut self, key: &str) -> Result<(), TranslatorError> {
        self.storage_mut()?;
        self.translated.remove(key);
        self.untranslated.remove(key);
        self.storage_mut()?.delete(key, None)?;
        Ok(())
    }

    /// Record that (key, plural) has no text.
    ///
    /// An existing `true` flag is never downgraded to `false`. Pairs that
    /// already have a text are left alone.
    ///
    /// # Errors
    /// `PluralOutOfRange`.
    pub fn set_untranslated(
        &mut self,
        key: &str,
        plural: usize,
        probably_exists_in_storage: bool,
    ) -> Result<(), TranslatorError> {
        self.check_plural(plural)?;
        if self.is_translated(key, plural) {
            return Ok(());
        }
        let flag = self.untranslated.entry(key.to_string()).or_default().entry(plural).or_default();
        if !*flag {
            *flag = probably_exists_in_storage;
        }
        Ok(())
    }

    /// Remove the marker of (key, plural).
    ///
    /// # Errors
    /// `PluralOutOfRange`.
    pub fn remove_untranslated(&mut self, key: &str, plural: usize) -> Result<(), TranslatorError> {
        self.check_plural(plural)?;
        self.clear_marker(key, plural);
        Ok(())
    }

    /// Remove every marker of `key`.
    pub fn remove_untranslated_forms(&mut self, key: &str) {
        self.untranslated.remove(key);
    }

    /// Drop the marker of (key, plural) and the key once it has none left.
    fn clear_marker(&mut self, key: &str, plural: usize) {
        if let Some(markers) = self.untranslated.get_mut(key) {
            markers.remove(&plural);
            if markers.is_empty() {
                self.untranslated.remove(key);
            }
        }
    }

    /// Forget all texts. Storage is not touched.
    pub fn clear_translated(&mut self) {
        self.translated.clear();
    }

    /// Forget all markers. Storage is not touched.
    pub fn clear_untranslated(&mut self) {
        self.untranslated.clear();
    }

    /// Resolve `key` and format it.
    ///
    /// `count` selects the plural form through the strategy and is appended
    /// to `params`; `None` selects form 0 and appends nothing. A missing text
    /// is marked untranslated and the key itself is used instead. Formatting
    /// only happens when there is at least one parameter.
    ///
    /// # Errors
    /// `PluralOutOfRange` when the strategy returns an invalid index,
    /// `Format` when the text does not fit the parameters.
    pub fn translate(
        &mut self,
        key: &str,
        count: Option<i64>,
        params: &[FormatArg],
    ) -> Result<String, TranslatorError> {
        let plural = count.map_or(0, |n| self.plural.plural(n));

        let found = self.get_text(key, plural)?.map(str::to_owned);
        let text = if let Some(text) = found {
            text
        } else {
            tracing::trace!(key, plural, "Untranslated key");
            self.set_untranslated(key, plural, false)?;
            key.to_string()
        };

        let mut args = params.to_vec();
        if let Some(n) = count {
            args.push(FormatArg::Int(n));
        }
        if args.is_empty() {
            return Ok(text);
        }

        Ok(sprintf(&text, &args)?)
    }

    /// All texts.
    #[must_use]
    pub const fn translated(&self) -> &Translations {
        &self.translated
    }

    /// All markers.
    #[must_use]
    pub const fn untranslated(&self) -> &Untranslated {
        &self.untranslated
    }

    /// Keys with at least one marker, sorted.
    #[must_use]
    pub fn untranslated_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.untranslated.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of translated keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.translated.len()
    }

    /// Whether no key has a text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translated.is_empty()
    }
}

impl Drop for Translator<'_> {
    fn drop(&mut self) {
        if self.storage.is_some() {
            tracing::warn!(
                keys = self.translated.len(),
                "Translator dropped without close(); final save skipped"
            );
        }
    }
}
