//! # Storage Layer
//!
//! Persistence for the expense document, plus configuration loading.
//!
//! ## Storage Formats
//!
//! | Data | Format | Default location |
//! |------|--------|------------------|
//! | Expenses | Pretty-printed JSON document | `data/expenses.json` |
//! | Config | TOML | `tracker.toml`, `<config dir>/config.toml` |
//!
//! ## Write Safety
//!
//! [`JsonStore`] rewrites the whole document on every save: it writes a
//! sibling temp file, syncs it and renames it over the target, so readers
//! only ever see a complete document. There is no cross-process locking;
//! concurrent writers race and the last rename wins.
//!
//! ## Key Types
//!
//! - [`Repository`] - load/save seam used by the service layer
//! - [`JsonStore`] - file-backed repository
//! - [`MemoryStore`] - in-memory repository
//! - [`Config`] - layered configuration

mod config;
mod json;
mod memory;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Document;

pub use config::{Config, ConfigFile};
pub use json::JsonStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not read data file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("data file {} is corrupted", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("data file {} has unsupported version {version} (this build reads version {expected})", .path.display())]
    UnsupportedVersion {
        path: PathBuf,
        version: u64,
        expected: u32,
    },

    #[error("could not write data file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize expenses")]
    Serialize(#[source] serde_json::Error),
}

/// Whole-document persistence for expenses
///
/// Every command loads the document once, changes it in memory and saves it
/// back, so implementations only need these two operations.
pub trait Repository {
    /// Loads the document, or an empty one if nothing has been stored yet
    fn load(&self) -> Result<Document, StorageError>;

    /// Replaces the stored document
    fn save(&self, document: &Document) -> Result<(), StorageError>;
}

impl<R: Repository + ?Sized> Repository for &R {
    fn load(&self) -> Result<Document, StorageError> {
        (**self).load()
    }

    fn save(&self, document: &Document) -> Result<(), StorageError> {
        (**self).save(document)
    }
}
