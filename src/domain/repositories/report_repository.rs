//! # Report Repository Trait
//!
//! 同期レポートの永続化を抽象化

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::entities::sync_report::SyncReport;

/// レポートリポジトリ
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// レポートを保存する
    ///
    /// # Arguments
    ///
    /// * `path` - 保存先のパス
    /// * `report` - 保存する同期レポート
    ///
    /// # Errors
    ///
    /// ファイルの書き込みに失敗した場合にエラーを返す
    async fn save(&self, path: &str, report: &SyncReport) -> Result<()>;
}
