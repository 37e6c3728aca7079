//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use chrono::{
    DateTime,
    Utc,
};

use crate::document::{
    DocumentMeta,
    TranslationDocument,
};
use crate::flat::FlatMap;

/// テスト用の `FlatMap` を作成する
pub(crate) fn flat_map(pairs: &[(&str, &str)]) -> FlatMap {
    pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

/// テスト用の固定時刻
pub(crate) fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_714_557_600, 0).unwrap_or_default()
}

/// テスト用の `TranslationDocument` を作成する
///
/// # Arguments
/// * `source` - ソース言語 (en) のキーと値
/// * `target` - ターゲット言語 (ko) のキーと値（キーは揃えない）
pub(crate) fn document(source: &[(&str, &str)], target: &[(&str, &str)]) -> TranslationDocument {
    TranslationDocument {
        id: "doc-1".to_string(),
        meta: DocumentMeta::new("en", "ko", None, fixed_time()),
        source: flat_map(source),
        target: flat_map(target),
    }
}
