use std::fs;
use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use super::types::{
    CatalogDocument,
    Storage,
    StorageError,
};
use crate::config::TranslatorSettings;
use crate::translator::Translator;

/// Storage backed by one JSON file per locale (`<directory>/<locale>.json`).
///
/// The parsed document is cached after the first read, so `save_one` and
/// `delete` rewrite the file from the cache instead of re-reading it.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    /// Catalog file
    path: PathBuf,
    /// Last document read or written
    document: Option<CatalogDocument>,
}

impl JsonFileStorage {
    /// Storage for `locale` inside `directory`.
    #[must_use]
    pub fn new(directory: impl AsRef<Path>, locale: &str) -> Self {
        Self::with_path(directory.as_ref().join(format!("{locale}.json")))
    }

    /// Storage for an explicit file path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), document: None }
    }

    /// Storage described by project settings.
    ///
    /// A relative `storage.directory` is resolved against `project_root`.
    #[must_use]
    pub fn from_settings(project_root: &Path, settings: &TranslatorSettings) -> Self {
        Self::new(project_root.join(&settings.storage.directory), &settings.locale)
    }

    /// Catalog file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used in error messages.
    fn origin(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }

    /// Read the file; a missing file is an empty catalog.
    fn read(&self) -> Result<CatalogDocument, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::debug!("Translation file not found, starting empty: {:?}", self.path);
                return Ok(CatalogDocument::default());
            }
            Err(source) => return Err(StorageError::Io { path: self.path.clone(), source }),
        };

        serde_json::from_str(&content)
            .map_err(|source| StorageError::Json { path: self.path.clone(), source })
    }

    /// Cached document, reading the file on first use.
    fn document_mut(&mut self) -> Result<&mut CatalogDocument, StorageError> {
        if self.document.is_none() {
            self.document = Some(self.read()?);
        }
        Ok(self.document.get_or_insert_with(CatalogDocument::default))
    }

    /// Write the cached document as pretty JSON.
    fn write(&self) -> Result<(), StorageError> {
        let Some(document) = &self.document else {
            return Ok(());
        };
        let io_error = |source: std::io::Error| StorageError::Io { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut content = serde_json::to_string_pretty(document)
            .map_err(|source| StorageError::Json { path: self.path.clone(), source })?;
        content.push('\n');
        fs::write(&self.path, content).map_err(io_error)
    }
}

impl Storage for JsonFileStorage {
    fn load(&mut self, translator: &mut Translator<'_>) -> Result<(), StorageError> {
        tracing::debug!("Loading translations from: {:?}", self.path);

        let document = self.read()?;
        document.apply_to(translator, &self.origin())?;
        self.document = Some(document);

        Ok(())
    }

    fn save(&mut self, translator: &Translator<'_>) -> Result<(), StorageError> {
        let document = CatalogDocument::from_translator(translator);
        tracing::debug!(
            keys = document.translated.len(),
            untranslated = document.untranslated.len(),
            "Saving translations to: {:?}",
            self.path
        );

        self.document = Some(document);
        self.write()
    }

    fn save_one(&mut self, key: &str, text: &str, plural: usize) -> Result<(), StorageError> {
        self.document_mut()?.set_one(key, text, plural);
        self.write()
    }

    fn delete(&mut self, key: &str, plural: Option<usize>) -> Result<(), StorageError> {
        self.document_mut()?.remove(key, plural);
        self.write()
    }
}
