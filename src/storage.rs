//! Persistence backends for translators
/// JSON file backend
mod json;
/// In-memory backend
mod memory;
/// Storage trait, errors and the catalog document
mod types;

pub use json::JsonFileStorage;
pub use memory::MemoryStorage;
pub use types::{
    CatalogDocument,
    Storage,
    StorageError,
};
