//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::document::{
    EditError,
    MalformedInputError,
    ValidationError,
};
use crate::input::InputError;
use crate::share::{
    ShareError,
    UploadError,
};
use crate::store::StoreError;

/// Any failure surfaced by [`crate::review::ReviewService`] or the CLI.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Malformed(#[from] MalformedInputError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Share(#[from] ShareError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to serialize review document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Snapshot {snapshot_id} not found for project {project_id}")]
    SnapshotNotFound { project_id: String, snapshot_id: String },

    /// The link carries neither a document nor an id.
    #[error("Not a review link: {0}")]
    InvalidLink(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
