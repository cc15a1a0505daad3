use thiserror::Error;

use crate::format::FormatError;
use crate::storage::StorageError;

/// Errors returned by [`Translator`](crate::Translator) operations
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// The plural index is not below the strategy's plural count
    #[error("The plural ({plural}) is bigger than is allowed ({max})")]
    PluralOutOfRange {
        /// Requested plural index
        plural: usize,
        /// Highest index the strategy allows
        max: usize,
    },
    /// An operation that writes through to storage was called without one
    #[error("No translation storage is configured for this translator")]
    StorageNotConfigured,
    /// Error reported by the storage backend, passed through as-is
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The resolved text could not be formatted with the given parameters
    #[error("Failed to format translated text: {0}")]
    Format(#[from] FormatError),
}
