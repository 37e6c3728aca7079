//! transedit
//!
//! JSON ロケールファイルの翻訳レビュー用ドキュメントを生成・検証・マージ・共有する

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod flat;
pub mod input;
pub mod review;
pub mod share;
pub mod store;
mod test_utils;

pub use error::{
    Error,
    Result,
};
