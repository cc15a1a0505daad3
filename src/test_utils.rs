//! Helpers shared by the unit test modules.
#![cfg(test)]

use std::sync::Arc;

use crate::plural::{
    Plural,
    PluralRule,
};
use crate::storage::{
    Storage,
    StorageError,
};
use crate::translator::{
    Translator,
    UntranslatedMarkers,
};

/// Two-form English plural strategy.
pub(crate) fn english() -> Arc<dyn Plural> {
    Arc::new(PluralRule::English)
}

/// Build an untranslated marker map from `(plural, flag)` pairs.
pub(crate) fn markers(entries: &[(usize, bool)]) -> UntranslatedMarkers {
    entries.iter().copied().collect()
}

/// Storage whose operations fail on demand.
///
/// Errors are `StorageError::Other` carrying "<operation> failed".
#[derive(Debug, Default)]
pub(crate) struct FailingStorage {
    /// Fail `load`
    fail_load: bool,
    /// Fail `save`, `save_one` and `delete`
    fail_writes: bool,
    /// Number of `save` calls
    save_attempts: usize,
}

impl FailingStorage {
    pub(crate) fn failing_load() -> Self {
        Self { fail_load: true, ..Self::default() }
    }

    pub(crate) fn failing_writes() -> Self {
        Self { fail_writes: true, ..Self::default() }
    }

    pub(crate) const fn save_attempts(&self) -> usize {
        self.save_attempts
    }

    /// `Err("<operation> failed")` when `fail` is set.
    fn check(fail: bool, operation: &str) -> Result<(), StorageError> {
        if fail { Err(StorageError::Other(format!("{operation} failed").into())) } else { Ok(()) }
    }
}

impl Storage for FailingStorage {
    fn load(&mut self, _translator: &mut Translator<'_>) -> Result<(), StorageError> {
        Self::check(self.fail_load, "load")
    }

    fn save(&mut self, _translator: &Translator<'_>) -> Result<(), StorageError> {
        self.save_attempts += 1;
        Self::check(self.fail_writes, "save")
    }

    fn save_one(&mut self, _key: &str, _text: &str, _plural: usize) -> Result<(), StorageError> {
        Self::check(self.fail_writes, "save_one")
    }

    fn delete(&mut self, _key: &str, _plural: Option<usize>) -> Result<(), StorageError> {
        Self::check(self.fail_writes, "delete")
    }
}
