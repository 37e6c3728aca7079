//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    ConfigError,
    TranseditSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: TranseditSettings,

    /// 設定ファイルを探したディレクトリ
    config_dir: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: TranseditSettings::default(), config_dir: None }
    }

    /// 設定を読み込む
    ///
    /// 設定ファイルの値を読み込んだ後、`upload.userHash` が未設定なら
    /// 環境変数 `CATBOX_USER_HASH` で補う。
    ///
    /// # Arguments
    /// * `config_dir` - 設定ファイルを探すディレクトリ
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, config_dir: Option<PathBuf>) -> Result<(), ConfigError> {
        self.load_settings_with_env(config_dir, |name| std::env::var(name).ok())
    }

    /// 環境変数の参照方法を指定して設定を読み込む
    ///
    /// # Errors
    /// [`Self::load_settings`] と同じ
    pub fn load_settings_with_env(
        &mut self,
        config_dir: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings from: {:?}", config_dir);

        let mut settings = if let Some(dir) = &config_dir {
            loader::load_from_dir(dir)?.map_or_else(TranseditSettings::default, |loaded| {
                tracing::debug!("Loaded settings file: {:?}", loaded);
                loaded
            })
        } else {
            TranseditSettings::default()
        };
        settings.apply_env(env);

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.config_dir = config_dir;
        tracing::debug!("Settings loaded successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &TranseditSettings {
        &self.current_settings
    }

    /// 設定ファイルを探したディレクトリを取得
    #[must_use]
    pub const fn config_dir(&self) -> Option<&PathBuf> {
        self.config_dir.as_ref()
    }
}
