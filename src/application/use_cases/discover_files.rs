//! # Discover Files Use Case
//!
//! アップロード対象ファイル発見ユースケース

use anyhow::Result;
use log::debug;
use std::path::Path;
use std::sync::Arc;

use crate::domain::entities::source_file::SourceFile;
use crate::domain::repositories::source_repository::SourceRepository;
use crate::domain::services::file_selection::{FileSelectionService, SelectionRules};

/// アップロード対象ファイル発見ユースケース
///
/// 同期元フォルダ直下のエントリから、ルールに合うものを名前順で返す
pub struct DiscoverFilesUseCase<R: SourceRepository> {
    source_repository: Arc<R>,
}

impl<R: SourceRepository> DiscoverFilesUseCase<R> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `source_repository` - ソースリポジトリ
    pub fn new(source_repository: Arc<R>) -> Self {
        Self { source_repository }
    }

    /// 対象ファイルを発見する
    ///
    /// # Arguments
    ///
    /// * `folder` - 同期元フォルダ
    /// * `rules` - 選別ルール
    ///
    /// # Errors
    ///
    /// フォルダの作成・読み取りに失敗した場合にエラーを返す
    pub async fn execute(&self, folder: &Path, rules: &SelectionRules) -> Result<Vec<SourceFile>> {
        let entries = self.source_repository.list_entries(folder).await?;
        let total = entries.len();

        let selected = FileSelectionService::select(entries, rules);
        debug!("{} of {} entries are eligible", selected.len(), total);

        Ok(selected)
    }
}
