//! Session and template persistence.
//!
//! The board does not know where saves go: it hands a [`SavedSession`] to a
//! [`SaveSink`] and moves on. Durability is the sink's problem; the shipped
//! sink writes a JSON document to the platform data directory and logs
//! failures without retrying, so a failed save never blocks interaction and
//! a later autosave tick tries again naturally.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::board::ExportDocument;
use crate::library::Framework;
use crate::note::{Section, SectionTemplate};
use crate::transform::CanvasTransform;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session document error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The resumable on-disk session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSession {
    pub id: Uuid,
    pub problem: String,
    pub framework: Framework,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub viewport: Option<CanvasTransform>,
    #[serde(rename = "lastModified")]
    pub last_modified: DateTime<Utc>,
}

/// Fire-and-forget persistence callback invoked by autosave and explicit
/// saves. Implementations must not panic; the board never awaits or retries.
pub trait SaveSink {
    fn save(&self, session: &SavedSession);
}

/// Stores the current session as a JSON file.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the persisted session, if one exists. A missing file is a
    /// normal fresh start; a corrupt file is an error.
    pub fn load(&self) -> Result<Option<SavedSession>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)?;
        let session = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(session))
    }

    pub fn store(&self, session: &SavedSession) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), session)?;
        Ok(())
    }

    /// Removes the persisted session (when the user abandons it).
    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(err) = std::fs::remove_file(&self.path) {
                log::error!("failed to remove session file: {err}");
            }
        }
    }
}

impl SaveSink for SessionStore {
    fn save(&self, session: &SavedSession) {
        match self.store(session) {
            Ok(()) => log::debug!("session saved to {}", self.path.display()),
            Err(err) => log::error!("session save failed: {err}"),
        }
    }
}

/// Stores the user's section templates as one JSON document.
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads all templates; a missing or unreadable file yields an empty
    /// list (templates are a convenience, never a blocker).
    pub fn load(&self) -> Vec<SectionTemplate> {
        if !self.path.exists() {
            return Vec::new();
        }
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) => {
                log::error!("failed to open templates: {err}");
                return Vec::new();
            }
        };
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(templates) => templates,
            Err(err) => {
                log::error!("failed to parse templates: {err}");
                Vec::new()
            }
        }
    }

    pub fn store(&self, templates: &[SectionTemplate]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), templates)?;
        Ok(())
    }
}

/// Writes an export document to a user-chosen path.
pub fn write_export(path: &Path, document: &ExportDocument) -> Result<(), StorageError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), document)?;
    Ok(())
}
