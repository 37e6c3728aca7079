//! Persistent progress: one row per project id, plus optional snapshots.
//!
//! Writes are last-write-wins. Callers coalesce rapid edits before calling
//! [`ProjectStore::put`]; nothing here debounces or versions rows.

mod fs;
mod memory;

use std::path::PathBuf;

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

pub use fs::FsStore;
pub use memory::MemoryStore;

use crate::document::{
    DocumentMeta,
    TranslationDocument,
};
use crate::flat::FlatMap;

/// A saved project: the document plus its last write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProject {
    pub id: String,
    pub meta: DocumentMeta,
    pub source: FlatMap,
    pub target: FlatMap,
    pub updated_at: DateTime<Utc>,
}

impl StoredProject {
    #[must_use]
    pub fn from_document(doc: TranslationDocument, updated_at: DateTime<Utc>) -> Self {
        let TranslationDocument { id, meta, source, target } = doc;
        Self { id, meta, source, target, updated_at }
    }

    #[must_use]
    pub fn into_document(self) -> TranslationDocument {
        TranslationDocument { id: self.id, meta: self.meta, source: self.source, target: self.target }
    }
}

/// A saved copy of a project's target values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub project_id: String,
    pub at: DateTime<Utc>,
    pub target: FlatMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Snapshot {
    /// New snapshot of `doc`'s current target values.
    #[must_use]
    pub fn of(doc: &TranslationDocument, at: DateTime<Utc>, note: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: doc.id.clone(),
            at,
            target: doc.target.clone(),
            note: note.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Errors raised by a store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored row at {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize row: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Id cannot be used as a storage key: {0:?}")]
    InvalidId(String),
}

/// Storage collaborator for saved projects.
pub trait ProjectStore {
    /// Insert or replace the row for `project.id`.
    fn put(&mut self, project: StoredProject) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Option<StoredProject>, StoreError>;

    /// Remove a project. Removing an unknown id is not an error.
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;

    /// All projects, most recently updated first.
    fn list(&self) -> Result<Vec<StoredProject>, StoreError>;
}

/// Snapshot history on top of a [`ProjectStore`].
///
/// Implementations delete a project's snapshots together with the project.
pub trait SnapshotStore: ProjectStore {
    fn save_snapshot(&mut self, snapshot: Snapshot) -> Result<(), StoreError>;

    /// Snapshots of one project, newest first.
    fn list_snapshots(&self, project_id: &str) -> Result<Vec<Snapshot>, StoreError>;

    fn get_snapshot(&self, project_id: &str, snapshot_id: &str) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.list_snapshots(project_id)?.into_iter().find(|s| s.id == snapshot_id))
    }
}

/// Orders projects most recently updated first, ties by id.
fn sort_by_recency(projects: &mut [StoredProject]) {
    projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
}

/// Orders snapshots newest first, ties by id.
fn sort_snapshots(snapshots: &mut [Snapshot]) {
    snapshots.sort_by(|a, b| b.at.cmp(&a.at).then_with(|| a.id.cmp(&b.id)));
}
