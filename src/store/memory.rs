//! In-memory store.

use std::collections::HashMap;

use super::{
    ProjectStore,
    Snapshot,
    SnapshotStore,
    StoreError,
    StoredProject,
    sort_by_recency,
    sort_snapshots,
};

/// [`ProjectStore`] kept in memory; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    projects: HashMap<String, StoredProject>,
    /// Snapshots keyed by project id.
    snapshots: HashMap<String, Vec<Snapshot>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryStore {
    fn put(&mut self, project: StoredProject) -> Result<(), StoreError> {
        self.projects.insert(project.id.clone(), project);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<StoredProject>, StoreError> {
        Ok(self.projects.get(id).cloned())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.projects.remove(id);
        self.snapshots.remove(id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<StoredProject>, StoreError> {
        let mut projects: Vec<StoredProject> = self.projects.values().cloned().collect();
        sort_by_recency(&mut projects);
        Ok(projects)
    }
}

impl SnapshotStore for MemoryStore {
    fn save_snapshot(&mut self, snapshot: Snapshot) -> Result<(), StoreError> {
        let snapshots = self.snapshots.entry(snapshot.project_id.clone()).or_default();
        snapshots.retain(|s| s.id != snapshot.id);
        snapshots.push(snapshot);
        Ok(())
    }

    fn list_snapshots(&self, project_id: &str) -> Result<Vec<Snapshot>, StoreError> {
        let mut snapshots = self.snapshots.get(project_id).cloned().unwrap_or_default();
        sort_snapshots(&mut snapshots);
        Ok(snapshots)
    }
}
