//! # Sync Configuration DTO
//!
//! 同期設定のData Transfer Object

use std::path::PathBuf;

use crate::domain::services::file_selection::SelectionRules;

/// 同期設定
///
/// 1回の同期実行に必要な設定情報
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// 同期元フォルダ（絶対パス）
    pub source_folder: PathBuf,
    /// 同期先ライブラリ名
    pub library: String,
    /// アップロード対象の判定ルール
    pub rules: SelectionRules,
    /// アップロード間の待機時間（ミリ秒）
    pub upload_delay_ms: u64,
    /// dry-run（アップロードしない）
    pub dry_run: bool,
}

impl SyncConfig {
    /// 新しい同期設定を作成します。
    ///
    /// ```
    /// use spsync::application::dto::sync_config::SyncConfig;
    /// use spsync::domain::services::file_selection::SelectionRules;
    ///
    /// let config = SyncConfig::new(
    ///     "/srv/drivers".into(),
    ///     "Documents".to_string(),
    ///     SelectionRules::new(["xml"], ["ORSTUP"]),
    ///     1000,
    ///     false,
    /// );
    ///
    /// assert_eq!(config.library, "Documents");
    /// assert_eq!(config.upload_delay_ms, 1000);
    /// ```
    pub fn new(
        source_folder: PathBuf,
        library: String,
        rules: SelectionRules,
        upload_delay_ms: u64,
        dry_run: bool,
    ) -> Self {
        Self {
            source_folder,
            library,
            rules,
            upload_delay_ms,
            dry_run,
        }
    }

    /// 同期元フォルダの表示用文字列
    pub fn source_folder_display(&self) -> String {
        self.source_folder.display().to_string()
    }
}
