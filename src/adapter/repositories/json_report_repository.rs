//! JSON Report Repository Implementation
//!
//! ReportRepositoryのJSON実装（同期結果をJSONファイルに保存）

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use std::fs;
use std::path::Path;

use crate::domain::entities::sync_report::SyncReport;
use crate::domain::repositories::report_repository::ReportRepository;

/// JSONファイルベースのレポートリポジトリ
pub struct JsonReportRepository;

impl JsonReportRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// ファイルにレポートを保存する（同期処理）
    fn save_sync(path: &str, report: &SyncReport) -> Result<()> {
        let path = Path::new(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create report directory")?;
        }

        let json = serde_json::to_string_pretty(report).context("Failed to serialize sync report")?;

        fs::write(path, json).context("Failed to write sync report file")?;

        info!(
            "Saved sync report: {} copied, {} errors -> {}",
            report.copied,
            report.errors,
            path.display()
        );

        Ok(())
    }
}

#[async_trait]
impl ReportRepository for JsonReportRepository {
    async fn save(&self, path: &str, report: &SyncReport) -> Result<()> {
        let path = path.to_string();
        let report = report.clone();
        tokio::task::spawn_blocking(move || Self::save_sync(&path, &report))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        Ok(())
    }
}

impl Default for JsonReportRepository {
    fn default() -> Self {
        Self::new()
    }
}
