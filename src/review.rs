//! Review lifecycle on top of a [`ProjectStore`].
//!
//! Every path into local storage goes through [`merge_progress`], so a
//! document loaded from a file, a link or the upload service never loses
//! progress already saved under the same id.

use std::path::Path;

use chrono::{
    DateTime,
    Utc,
};

use crate::document::{
    GenerateOptions,
    MalformedInputError,
    TranslationDocument,
    generate_at,
    merge_progress,
    to_document_json,
};
use crate::error::{
    Error,
    Result,
};
use crate::input::{
    parse_document_json,
    read_document_file,
};
use crate::share::{
    BlobService,
    LinkTarget,
    resolve_fragment,
    resolve_link,
};
use crate::store::{
    ProjectStore,
    Snapshot,
    SnapshotStore,
    StoredProject,
};

/// Orchestrates generation, merging and persistence of review projects.
#[derive(Debug)]
pub struct ReviewService<S> {
    store: S,
    clock: fn() -> DateTime<Utc>,
}

impl<S: ProjectStore> ReviewService<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Utc::now)
    }

    /// Service stamping `updatedAt`, `createdAt` and snapshot times with `clock`.
    #[must_use]
    pub fn with_clock(store: S, clock: fn() -> DateTime<Utc>) -> Self {
        Self { store, clock }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Generate a new document and save it.
    ///
    /// # Errors
    /// Generation and store errors.
    pub fn create(&mut self, options: GenerateOptions<'_>) -> Result<TranslationDocument> {
        let doc = generate_at(options, (self.clock)())?;
        self.save(&doc)?;
        tracing::debug!(id = %doc.id, keys = doc.source.len(), "Created project");
        Ok(doc)
    }

    /// Merge `doc` with any progress saved under its id, then save the result.
    ///
    /// # Errors
    /// Store errors.
    pub fn import(&mut self, doc: &TranslationDocument) -> Result<TranslationDocument> {
        let prior = self.store.get(&doc.id)?;
        let merged = merge_progress(doc, prior.as_ref().map(|p| &p.target));
        self.save(&merged)?;
        tracing::debug!(id = %merged.id, had_progress = prior.is_some(), "Imported review document");
        Ok(merged)
    }

    /// Read a review file and [`import`](Self::import) it.
    ///
    /// # Errors
    /// Read, parse, validation and store errors.
    pub fn import_file(&mut self, path: &Path) -> Result<TranslationDocument> {
        let doc = read_document_file(path)?;
        self.import(&doc)
    }

    /// Open a URL fragment: an embedded document is imported, a bare id is opened.
    ///
    /// # Errors
    /// [`Error::InvalidLink`] when the fragment carries neither.
    pub fn open_fragment(&mut self, hash: &str) -> Result<TranslationDocument> {
        match resolve_fragment(hash) {
            Some(LinkTarget::Document(doc)) => self.import(&doc),
            Some(LinkTarget::ProjectId(id)) => self.open(&id),
            Some(LinkTarget::ShareId(_)) | None => Err(Error::InvalidLink(hash.to_string())),
        }
    }

    /// Fetch a document from the upload service and import it.
    ///
    /// # Errors
    /// Upload, parse, validation and store errors.
    pub async fn open_shared<B: BlobService>(
        &mut self,
        blobs: &B,
        remote_id: &str,
    ) -> Result<TranslationDocument> {
        let bytes = blobs.fetch(remote_id).await?;
        let text = String::from_utf8(bytes)
            .map_err(|e| MalformedInputError::new(format!("Shared document is not UTF-8: {e}")))?;
        let doc = parse_document_json(&text)?;
        self.import(&doc)
    }

    /// Open any review link: document fragment, project id or share id.
    ///
    /// # Errors
    /// [`Error::InvalidLink`] for links that point nowhere, otherwise the
    /// errors of the branch taken.
    pub async fn open_link<B: BlobService>(
        &mut self,
        blobs: &B,
        link: &str,
    ) -> Result<TranslationDocument> {
        match resolve_link(link) {
            Some(LinkTarget::Document(doc)) => self.import(&doc),
            Some(LinkTarget::ProjectId(id)) => self.open(&id),
            Some(LinkTarget::ShareId(id)) => self.open_shared(blobs, &id).await,
            None => Err(Error::InvalidLink(link.to_string())),
        }
    }

    /// # Errors
    /// [`Error::ProjectNotFound`] for unknown ids, or store errors.
    pub fn open(&self, id: &str) -> Result<TranslationDocument> {
        self.store
            .get(id)?
            .map(StoredProject::into_document)
            .ok_or_else(|| Error::ProjectNotFound(id.to_string()))
    }

    /// Saved projects, most recently updated first.
    ///
    /// # Errors
    /// Store errors.
    pub fn list(&self) -> Result<Vec<StoredProject>> {
        Ok(self.store.list()?)
    }

    /// # Errors
    /// Store errors.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.store.delete(id)?;
        tracing::debug!(%id, "Deleted project");
        Ok(())
    }

    /// Write `doc` as-is, stamped with the current time.
    ///
    /// # Errors
    /// Store errors.
    pub fn save(&mut self, doc: &TranslationDocument) -> Result<()> {
        self.store.put(StoredProject::from_document(doc.clone(), (self.clock)()))?;
        Ok(())
    }

    /// Set one translation of a saved project.
    ///
    /// # Errors
    /// [`Error::ProjectNotFound`], [`Error::Edit`] for unknown keys, or store errors.
    pub fn translate(&mut self, id: &str, key: &str, value: &str) -> Result<TranslationDocument> {
        let mut doc = self.open(id)?;
        doc.set_translation(key, value)?;
        self.save(&doc)?;
        Ok(doc)
    }

    /// Upload a saved project and return its remote id.
    ///
    /// # Errors
    /// [`Error::ProjectNotFound`], serialization or upload errors.
    pub async fn share_upload<B: BlobService>(&self, blobs: &B, id: &str) -> Result<String> {
        let doc = self.open(id)?;
        let json = to_document_json(&doc)?;
        let remote_id = blobs.upload(json.into_bytes()).await?;
        tracing::debug!(%id, %remote_id, "Uploaded project");
        Ok(remote_id)
    }
}

impl<S: SnapshotStore> ReviewService<S> {
    /// Save the current target values of a project.
    ///
    /// # Errors
    /// [`Error::ProjectNotFound`] or store errors.
    pub fn snapshot(&mut self, id: &str, note: Option<String>) -> Result<Snapshot> {
        let doc = self.open(id)?;
        let snapshot = Snapshot::of(&doc, (self.clock)(), note);
        self.store.save_snapshot(snapshot.clone())?;
        tracing::debug!(%id, snapshot = %snapshot.id, "Saved snapshot");
        Ok(snapshot)
    }

    /// Snapshots of a project, newest first.
    ///
    /// # Errors
    /// Store errors.
    pub fn snapshots(&self, id: &str) -> Result<Vec<Snapshot>> {
        Ok(self.store.list_snapshots(id)?)
    }

    /// Merge a snapshot's values back into the project and save it.
    ///
    /// Keys the snapshot does not know keep their current value.
    ///
    /// # Errors
    /// [`Error::ProjectNotFound`], [`Error::SnapshotNotFound`] or store errors.
    pub fn restore(&mut self, id: &str, snapshot_id: &str) -> Result<TranslationDocument> {
        let current = self.open(id)?;
        let snapshot = self.store.get_snapshot(id, snapshot_id)?.ok_or_else(|| {
            Error::SnapshotNotFound { project_id: id.to_string(), snapshot_id: snapshot_id.to_string() }
        })?;
        let restored = merge_progress(&current, Some(&snapshot.target));
        self.save(&restored)?;
        tracing::debug!(%id, %snapshot_id, "Restored snapshot");
        Ok(restored)
    }
}
