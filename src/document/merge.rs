//! Reconciles an incoming document with locally saved progress.

use super::TranslationDocument;
use crate::flat::FlatMap;

/// Merge a base document with previously saved target values.
///
/// For every source key the prior value wins, then the base document's own
/// value, then `""`. Keys outside `base.source` are dropped from both sides,
/// so the result always has `keys(target) == keys(source)`. Local progress
/// unconditionally overrides the incoming values; there is no conflict
/// detection.
#[must_use]
pub fn merge_progress(base: &TranslationDocument, prior_target: Option<&FlatMap>) -> TranslationDocument {
    let target: FlatMap = base
        .source
        .keys()
        .map(|key| {
            let value = prior_target
                .and_then(|prior| prior.get(key))
                .or_else(|| base.target.get(key))
                .cloned()
                .unwrap_or_default();
            (key.clone(), value)
        })
        .collect();

    tracing::debug!(
        id = %base.id,
        keys = target.len(),
        with_prior = prior_target.is_some(),
        "Merged review progress"
    );

    TranslationDocument { target, ..base.clone() }
}
