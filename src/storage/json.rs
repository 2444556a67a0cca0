//! JSON file storage for expenses
//!
//! The document lives in a single JSON file that is rewritten in full on
//! every save (temp file + rename).

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{Repository, StorageError};
use crate::domain::{Document, CURRENT_VERSION};

/// Just enough of the document to decide how to read the rest
#[derive(Deserialize)]
struct Header {
    version: u64,
}

/// Store for the expense document in JSON format
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Creates a new store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path used while writing (`expenses.json` -> `expenses.json.tmp`)
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn corrupt(&self, source: serde_json::Error) -> StorageError {
        StorageError::Corrupt {
            path: self.path.clone(),
            source,
        }
    }

    /// Parses file contents, dispatching on the schema version
    fn parse(&self, content: &str) -> Result<Document, StorageError> {
        let header: Header = serde_json::from_str(content).map_err(|e| self.corrupt(e))?;

        match header.version {
            1 => serde_json::from_str(content).map_err(|e| self.corrupt(e)),
            version => Err(StorageError::UnsupportedVersion {
                path: self.path.clone(),
                version,
                expected: CURRENT_VERSION,
            }),
        }
    }

    fn write_temp(&self, temp_path: &Path, content: &str) -> io::Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;

        let mut writer = BufWriter::new(&file);
        writer.write_all(content.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.sync_all()
    }
}

impl Repository for JsonStore {
    fn load(&self) -> Result<Document, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "data file not found, starting empty");
                return Ok(Document::new());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document = self.parse(&content)?;
        tracing::info!(
            path = %self.path.display(),
            count = document.len(),
            "loaded expenses"
        );
        Ok(document)
    }

    fn save(&self, document: &Document) -> Result<(), StorageError> {
        let write_err = |source: io::Error| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = serde_json::to_string_pretty(document).map_err(StorageError::Serialize)?;

        // Write to temp file first
        let temp_path = self.temp_path();
        if let Err(e) = self.write_temp(&temp_path, &content) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(e));
        }

        // Atomic rename
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(e));
        }

        tracing::info!(
            path = %self.path.display(),
            count = document.len(),
            "saved expenses"
        );
        Ok(())
    }
}
