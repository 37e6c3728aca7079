//! JSON-file store.
//!
//! ```text
//! <root>/projects/<id>.json
//! <root>/snapshots/<project id>/<snapshot id>.json
//! ```
//!
//! Ids are opaque strings. Ids made of ASCII alphanumerics and `-_.` are used
//! as file names directly; any other id is stored as `~<hex of its UTF-8>`, and
//! ids too long even for that as `~~<uuid v5 of the id>`. Rows keep the real id,
//! which [`FsStore`] checks on read.

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{
    ProjectStore,
    Snapshot,
    SnapshotStore,
    StoreError,
    StoredProject,
    sort_by_recency,
    sort_snapshots,
};

/// Project rows.
const PROJECTS_DIR: &str = "projects";
/// Snapshot rows, one directory per project.
const SNAPSHOTS_DIR: &str = "snapshots";
/// Longest file stem written, well under common 255-byte name limits.
const MAX_STEM_LEN: usize = 200;

/// Store keeping one pretty-printed JSON file per row.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the directories cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        for dir in [PROJECTS_DIR, SNAPSHOTS_DIR] {
            let path = root.join(dir);
            std::fs::create_dir_all(&path).map_err(|source| StoreError::Io { path, source })?;
        }
        tracing::debug!(root = %root.display(), "Opened project store");
        Ok(Self { root })
    }

    /// Directory the store was opened at.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `projects/<stem>.json`
    fn project_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(PROJECTS_DIR).join(format!("{}.json", file_stem(id)?)))
    }

    /// `snapshots/<project stem>/`
    fn snapshot_dir(&self, project_id: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(SNAPSHOTS_DIR).join(file_stem(project_id)?))
    }
}

/// File name stem for an id. Only the empty id is refused.
fn file_stem(id: &str) -> Result<String, StoreError> {
    if id.is_empty() {
        return Err(StoreError::InvalidId(id.to_string()));
    }

    let plain = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if id.len() <= MAX_STEM_LEN && id != "." && id != ".." && id.chars().all(plain) {
        return Ok(id.to_string());
    }

    // '~' never appears in a plain stem, so encoded stems cannot collide with one
    if id.len().saturating_mul(2) < MAX_STEM_LEN {
        let hex: String = id.bytes().map(|b| format!("{b:02x}")).collect();
        return Ok(format!("~{hex}"));
    }
    Ok(format!("~~{}", uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, id.as_bytes()).simple()))
}

/// Write via a temporary file and rename so readers never see half a row.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes).map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
    std::fs::rename(&tmp, path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })
}

/// `None` when the file does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Corrupt { path: path.to_path_buf(), source })
}

/// Reads every `*.json` row in `dir`, skipping unreadable ones.
fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, StoreError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(StoreError::Io { path: dir.to_path_buf(), source }),
    };

    let mut rows = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        match read_json(&path) {
            Ok(Some(row)) => rows.push(row),
            Ok(None) => {}
            Err(err) => tracing::warn!(path = %path.display(), %err, "Skipping unreadable row"),
        }
    }
    Ok(rows)
}

/// Missing files count as removed.
fn remove_file(path: &Path) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => {
            Err(StoreError::Io { path: path.to_path_buf(), source: e })
        }
        _ => Ok(()),
    }
}

impl ProjectStore for FsStore {
    fn put(&mut self, project: StoredProject) -> Result<(), StoreError> {
        let path = self.project_path(&project.id)?;
        tracing::debug!(id = %project.id, "Saving project");
        write_json(&path, &project)
    }

    fn get(&self, id: &str) -> Result<Option<StoredProject>, StoreError> {
        let row: Option<StoredProject> = read_json(&self.project_path(id)?)?;
        Ok(row.filter(|project| {
            let matches = project.id == id;
            if !matches {
                tracing::warn!(%id, stored = %project.id, "Row file holds another project");
            }
            matches
        }))
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        remove_file(&self.project_path(id)?)?;
        let snapshots = self.snapshot_dir(id)?;
        match std::fs::remove_dir_all(&snapshots) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                Err(StoreError::Io { path: snapshots, source: e })
            }
            _ => {
                tracing::debug!(%id, "Deleted project");
                Ok(())
            }
        }
    }

    fn list(&self) -> Result<Vec<StoredProject>, StoreError> {
        let mut projects: Vec<StoredProject> = read_all(&self.root.join(PROJECTS_DIR))?;
        sort_by_recency(&mut projects);
        Ok(projects)
    }
}

impl SnapshotStore for FsStore {
    fn save_snapshot(&mut self, snapshot: Snapshot) -> Result<(), StoreError> {
        let stem = file_stem(&snapshot.id)?;
        let dir = self.snapshot_dir(&snapshot.project_id)?;
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io { path: dir.clone(), source })?;
        write_json(&dir.join(format!("{stem}.json")), &snapshot)
    }

    fn list_snapshots(&self, project_id: &str) -> Result<Vec<Snapshot>, StoreError> {
        let mut snapshots: Vec<Snapshot> = read_all(&self.snapshot_dir(project_id)?)?;
        snapshots.retain(|s| s.project_id == project_id);
        sort_snapshots(&mut snapshots);
        Ok(snapshots)
    }

    fn get_snapshot(&self, project_id: &str, snapshot_id: &str) -> Result<Option<Snapshot>, StoreError> {
        let path = self.snapshot_dir(project_id)?.join(format!("{}.json", file_stem(snapshot_id)?));
        let row: Option<Snapshot> = read_json(&path)?;
        Ok(row.filter(|s| s.id == snapshot_id && s.project_id == project_id))
    }
}
