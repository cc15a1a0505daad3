use super::types::{
    CatalogDocument,
    Storage,
    StorageError,
};
use crate::translator::Translator;

/// Storage that keeps the catalog in a [`CatalogDocument`].
///
/// Useful for tests and for callers that persist the document themselves.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    document: CatalogDocument,
    saves: usize,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-filled with `document`.
    #[must_use]
    pub const fn from_document(document: CatalogDocument) -> Self {
        Self { document, saves: 0 }
    }

    /// The stored catalog.
    #[must_use]
    pub const fn document(&self) -> &CatalogDocument {
        &self.document
    }

    /// Consume the storage and return its catalog.
    #[must_use]
    pub fn into_document(self) -> CatalogDocument {
        self.document
    }

    /// Number of full saves received.
    #[must_use]
    pub const fn save_count(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn load(&mut self, translator: &mut Translator<'_>) -> Result<(), StorageError> {
        self.document.apply_to(translator, "memory")
    }

    fn save(&mut self, translator: &Translator<'_>) -> Result<(), StorageError> {
        self.document = CatalogDocument::from_translator(translator);
        self.saves += 1;
        Ok(())
    }

    fn save_one(&mut self, key: &str, text: &str, plural: usize) -> Result<(), StorageError> {
        self.document.set_one(key, text, plural);
        Ok(())
    }

    fn delete(&mut self, key: &str, plural: Option<usize>) -> Result<(), StorageError> {
        self.document.remove(key, plural);
        Ok(())
    }
}
