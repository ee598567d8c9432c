use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::backend::interface::{check_storable, BackendError, LedgerStore, Result};
use crate::core::Ledger;

/// Keeps the ledger as a pretty-printed JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf
}

#[derive(Serialize)]
struct Document<'a> {
    saved_at: DateTime<Utc>,
    ledger: &'a Ledger
}

#[derive(Deserialize)]
struct StoredDocument {
    saved_at: DateTime<Utc>,
    ledger: Ledger
}

impl JsonStore {
    pub fn new(path: impl AsRef<Path>) -> JsonStore {
        JsonStore { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> BackendError {
        BackendError::Io { path: path.to_path_buf(), source }
    }

    /// Write `content` and wait until it has reached the disk.
    fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(content)?;
        file.sync_all()
    }

    /// Sibling file the snapshot is written to before it replaces the real one.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        return self.path.with_file_name(name);
    }
}

impl LedgerStore for JsonStore {
    fn load(&self) -> Result<Option<Ledger>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(&self.path, err))
        };

        let document: StoredDocument = serde_json::from_str(&content)?;
        log::info!("loaded {} accounts from {} (saved at {})",
            document.ledger.len(), self.path.display(), document.saved_at);
        return Ok(Some(document.ledger));
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        check_storable(ledger)?;
        let document = Document { saved_at: Utc::now(), ledger };
        let content = serde_json::to_string_pretty(&document)?;

        let staging = self.staging_path();
        Self::write_synced(&staging, content.as_bytes()).map_err(|err| self.io_error(&staging, err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(&self.path, err))?;

        log::debug!("saved {} accounts to {}", ledger.len(), self.path.display());
        return Ok(());
    }
}
