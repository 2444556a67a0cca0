//! In-memory storage
//!
//! Holds the document in a `RefCell`; nothing touches the disk.

use std::cell::{Cell, RefCell};

use super::{Repository, StorageError};
use crate::domain::Document;

#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RefCell<Document>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `document`
    pub fn with_document(document: Document) -> Self {
        Self {
            document: RefCell::new(document),
            saves: Cell::new(0),
        }
    }

    /// Returns a copy of the currently stored document
    pub fn snapshot(&self) -> Document {
        self.document.borrow().clone()
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl Repository for MemoryStore {
    fn load(&self) -> Result<Document, StorageError> {
        Ok(self.document.borrow().clone())
    }

    fn save(&self, document: &Document) -> Result<(), StorageError> {
        *self.document.borrow_mut() = document.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
