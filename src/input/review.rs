//! Review file (`.transedit`) input.

use std::path::Path;

use serde_json::Value;

use super::InputError;
use crate::document::{
    MalformedInputError,
    TranslationDocument,
    validate,
};

/// Parse and validate review-file text.
///
/// # Errors
/// Returns [`InputError::Malformed`] for invalid JSON and
/// [`InputError::Invalid`] when the structure check fails.
pub fn parse_document_json(text: &str) -> Result<TranslationDocument, InputError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| MalformedInputError::new(format!("Invalid JSON: {e}")))?;
    Ok(validate(&value)?)
}

/// Read, parse and validate a review file.
///
/// # Errors
/// See [`parse_document_json`]; unreadable files yield [`InputError::Read`].
pub fn read_document_file(path: &Path) -> Result<TranslationDocument, InputError> {
    tracing::debug!(path = %path.display(), "Reading review file");
    let content = std::fs::read_to_string(path)
        .map_err(|source| InputError::Read { path: path.to_path_buf(), source })?;
    parse_document_json(&content).inspect_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Rejected review file");
    })
}
