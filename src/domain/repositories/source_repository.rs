//! # Source Repository Trait
//!
//! 同期元フォルダへのアクセスを抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::source_file::SourceFile;

/// ソースリポジトリ
///
/// ローカルの同期元フォルダの列挙と読み込みを担当するリポジトリ
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// フォルダ直下のエントリを列挙する
    ///
    /// # Arguments
    ///
    /// * `folder` - 同期元フォルダのパス
    ///
    /// # Returns
    ///
    /// 名前順に並んだエントリのリスト（フォルダが無ければ作成して空を返す）
    async fn list_entries(&self, folder: &Path) -> Result<Vec<SourceFile>>;

    /// ファイルの内容を読み込む
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
}
