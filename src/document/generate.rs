//! Builds review documents from source and target locale JSON.

use chrono::{
    DateTime,
    Utc,
};
use serde_json::Value;
use thiserror::Error;

use super::{
    DocumentMeta,
    TranslationDocument,
};
use crate::flat::{
    FlatMap,
    flatten,
};

/// Input that cannot be turned into a review document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed input: {reason}")]
pub struct MalformedInputError {
    pub reason: String,
}

impl MalformedInputError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Parameters for [`generate`].
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions<'a> {
    /// Parsed source-language locale JSON.
    pub source: &'a Value,
    /// Parsed target-language locale JSON, if the translator already has one.
    pub target: Option<&'a Value>,
    pub source_language: &'a str,
    pub target_language: &'a str,
    /// Reuse an existing project id. A fresh id creates a new project.
    pub id: Option<&'a str>,
    pub title: Option<&'a str>,
}

impl<'a> GenerateOptions<'a> {
    #[must_use]
    pub const fn new(source: &'a Value, source_language: &'a str, target_language: &'a str) -> Self {
        Self { source, target: None, source_language, target_language, id: None, title: None }
    }

    #[must_use]
    pub const fn with_target(mut self, target: Option<&'a Value>) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub const fn with_id(mut self, id: Option<&'a str>) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub const fn with_title(mut self, title: Option<&'a str>) -> Self {
        self.title = title;
        self
    }
}

/// Generate a review document stamped with the current time.
///
/// # Errors
/// Returns [`MalformedInputError`] when a language code or a supplied id is
/// blank.
pub fn generate(options: GenerateOptions<'_>) -> Result<TranslationDocument, MalformedInputError> {
    generate_at(options, Utc::now())
}

/// Generate a review document with an explicit creation time.
///
/// Target keys are aligned to the source keys: missing ones are padded with
/// `""` and keys absent from the source are dropped.
///
/// # Errors
/// See [`generate`].
pub fn generate_at(
    options: GenerateOptions<'_>,
    created_at: DateTime<Utc>,
) -> Result<TranslationDocument, MalformedInputError> {
    let source_language = options.source_language.trim();
    let target_language = options.target_language.trim();
    if source_language.is_empty() {
        return Err(MalformedInputError::new("source language code is empty"));
    }
    if target_language.is_empty() {
        return Err(MalformedInputError::new("target language code is empty"));
    }

    let id = match options.id {
        Some(id) if id.trim().is_empty() => return Err(MalformedInputError::new("document id is empty")),
        Some(id) => id.to_string(),
        None => uuid::Uuid::new_v4().to_string(),
    };

    let source = flatten(options.source);
    let candidate = options.target.map(flatten).unwrap_or_default();
    let target: FlatMap = source
        .keys()
        .map(|key| (key.clone(), candidate.get(key).cloned().unwrap_or_default()))
        .collect();

    let dropped = candidate.keys().filter(|key| !source.contains_key(*key)).count();
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped target keys that are not in the source");
    }
    tracing::debug!(%id, keys = source.len(), "Generated review document");

    let title = options.title.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);

    Ok(TranslationDocument {
        id,
        meta: DocumentMeta::new(source_language, target_language, title, created_at),
        source,
        target,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::document::{
        FORMAT_TAG,
        FORMAT_VERSION,
        stats,
    };
    use crate::test_utils::flat_map;

    #[googletest::test]
    fn test_generate_nested_with_full_target() {
        let source = json!({ "a": { "b": "Hello" } });
        let target = json!({ "a": { "b": "안녕" } });

        let doc = generate(GenerateOptions::new(&source, "en", "ko").with_target(Some(&target)))
            .unwrap();

        assert_eq!(doc.source, flat_map(&[("a.b", "Hello")]));
        assert_eq!(doc.target, flat_map(&[("a.b", "안녕")]));
        let summary = stats(&doc);
        expect_that!(summary.total, eq(1));
        expect_that!(summary.translated, eq(1));
        expect_that!(summary.percent, eq(100));
    }

    #[googletest::test]
    fn test_generate_pads_missing_and_drops_extra_keys() {
        let source = json!({ "a": "Hi", "c": "Bye" });
        let target = json!({ "a": "안녕", "extra": "x" });

        let doc = generate(GenerateOptions::new(&source, "en", "ko").with_target(Some(&target)))
            .unwrap();

        assert_eq!(doc.target, flat_map(&[("a", "안녕"), ("c", "")]));
    }

    #[googletest::test]
    fn test_generate_without_target() {
        let source = json!({ "greeting": "Hi", "list": ["one", "two"] });

        let doc = generate(GenerateOptions::new(&source, "en", "fr")).unwrap();

        assert_eq!(doc.target, flat_map(&[("greeting", ""), ("list.0", ""), ("list.1", "")]));
    }

    #[googletest::test]
    fn test_generate_stamps_meta() {
        let source = json!({ "a": "Hi" });
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap().to_utc();

        let doc = generate_at(
            GenerateOptions::new(&source, " en ", "ko").with_title(Some(" Docs ")),
            created_at,
        )
        .unwrap();

        expect_that!(doc.meta.format_tag, eq(FORMAT_TAG));
        expect_that!(doc.meta.format_version, eq(FORMAT_VERSION));
        expect_that!(doc.meta.source_language_code, eq("en"));
        expect_that!(doc.meta.target_language_code, eq("ko"));
        expect_that!(doc.meta.title, some(eq("Docs")));
        expect_that!(doc.meta.created_at, eq(created_at));
    }

    #[googletest::test]
    fn test_generate_reuses_supplied_id() {
        let source = json!({ "a": "Hi" });

        let doc = generate(GenerateOptions::new(&source, "en", "ko").with_id(Some("project-1")))
            .unwrap();

        expect_that!(doc.id, eq("project-1"));
    }

    #[rstest]
    #[case::surrounding_spaces(" abc ")]
    #[case::inner_punctuation("My Project:1")]
    fn test_generate_keeps_supplied_id_verbatim(#[case] id: &str) {
        let source = json!({ "a": "Hi" });

        let doc = generate(GenerateOptions::new(&source, "en", "ko").with_id(Some(id))).unwrap();

        assert_eq!(doc.id, id);
    }

    #[googletest::test]
    fn test_generate_fresh_ids_differ() {
        let source = json!({ "a": "Hi" });

        let first = generate(GenerateOptions::new(&source, "en", "ko")).unwrap();
        let second = generate(GenerateOptions::new(&source, "en", "ko")).unwrap();

        expect_that!(first.id, not(eq(&second.id)));
        expect_that!(first.id.is_empty(), eq(false));
    }

    #[rstest]
    #[case::blank_source_language("", "ko", None)]
    #[case::blank_target_language("en", "  ", None)]
    #[case::blank_id("en", "ko", Some(" "))]
    fn test_generate_rejects_blank_inputs(
        #[case] source_language: &str,
        #[case] target_language: &str,
        #[case] id: Option<&str>,
    ) {
        let source = json!({ "a": "Hi" });

        let result =
            generate(GenerateOptions::new(&source, source_language, target_language).with_id(id));

        assert!(result.is_err());
    }
}
