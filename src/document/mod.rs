//! Review document model and the pure operations over it.

mod export;
mod generate;
mod merge;
mod search;
mod stats;
mod validate;

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

pub use export::{
    to_document_json,
    to_locale_json,
};
pub use generate::{
    GenerateOptions,
    MalformedInputError,
    generate,
    generate_at,
};
pub use merge::merge_progress;
pub use search::search;
pub use stats::{
    Stats,
    stats,
};
pub use validate::{
    ValidationError,
    validate,
};

use crate::flat::FlatMap;

/// Value of `meta.formatTag` for every review file.
pub const FORMAT_TAG: &str = "transedit";

/// The only `meta.formatVersion` this build reads and writes.
pub const FORMAT_VERSION: u64 = 1;

/// Metadata block of a review file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub format_tag: String,
    pub format_version: u64,
    pub source_language_code: String,
    pub target_language_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DocumentMeta {
    /// Metadata stamped with the current format tag and version.
    #[must_use]
    pub fn new(
        source_language_code: impl Into<String>,
        target_language_code: impl Into<String>,
        title: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            format_tag: FORMAT_TAG.to_string(),
            format_version: FORMAT_VERSION,
            source_language_code: source_language_code.into(),
            target_language_code: target_language_code.into(),
            title,
            created_at,
        }
    }

    /// Title for listings, falling back to the language pair.
    #[must_use]
    pub fn display_title(&self) -> String {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(
                || format!("{} → {}", self.source_language_code, self.target_language_code),
                str::to_string,
            )
    }
}

/// A review file: source strings plus the translator's progress.
///
/// `target` is keyed by exactly the keys of `source` for every document that
/// came out of [`generate`], [`merge_progress`] or the editing methods.
/// [`validate`] alone does not guarantee it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationDocument {
    pub id: String,
    pub meta: DocumentMeta,
    pub source: FlatMap,
    pub target: FlatMap,
}

/// Errors raised when editing a document in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The key is not part of the source strings.
    #[error("Unknown translation key: {0}")]
    UnknownKey(String),
}

impl TranslationDocument {
    /// Replaces the translation of a single key.
    ///
    /// # Errors
    /// Returns [`EditError::UnknownKey`] when `key` is not a source key.
    pub fn set_translation(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        if !self.source.contains_key(key) {
            return Err(EditError::UnknownKey(key.to_string()));
        }
        self.target.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Source keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.source.keys().map(String::as_str)
    }

    /// Target value for `key`, empty when untranslated.
    #[must_use]
    pub fn translation(&self, key: &str) -> &str {
        self.target.get(key).map_or("", String::as_str)
    }
}
