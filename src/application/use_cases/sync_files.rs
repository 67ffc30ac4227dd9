//! # Sync Files Use Case
//!
//! ファイル同期ユースケース（存在確認 → アップロード）

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::application::dto::sync_config::SyncConfig;
use crate::domain::entities::source_file::SourceFile;
use crate::domain::entities::sync_report::{FileOutcome, SyncReport};
use crate::domain::repositories::remote_drive_repository::RemoteDriveRepository;
use crate::domain::repositories::source_repository::SourceRepository;

/// ファイル同期ユースケース
///
/// SharePoint上に存在しないファイルだけを1件ずつアップロードする。
/// ファイル単位の失敗はレポートに記録し、処理は継続する
pub struct SyncFilesUseCase<S: SourceRepository, D: RemoteDriveRepository> {
    source_repository: Arc<S>,
    remote_repository: Arc<D>,
}

impl<S: SourceRepository, D: RemoteDriveRepository> SyncFilesUseCase<S, D> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `source_repository` - ソースリポジトリ
    /// * `remote_repository` - 接続済みのリモートドライブ
    pub fn new(source_repository: Arc<S>, remote_repository: Arc<D>) -> Self {
        Self {
            source_repository,
            remote_repository,
        }
    }

    /// ファイルを同期する
    ///
    /// # Arguments
    ///
    /// * `files` - 対象ファイル（名前順）
    /// * `config` - 同期設定
    /// * `run_id` - 実行ID
    /// * `hostname` - 実行ホスト名
    ///
    /// # Returns
    ///
    /// 全ファイルの結果を記録した同期レポート
    pub async fn execute(
        &self,
        files: &[SourceFile],
        config: &SyncConfig,
        run_id: &str,
        hostname: &str,
    ) -> SyncReport {
        let mut report = SyncReport::new(
            run_id,
            hostname,
            config.source_folder_display(),
            config.library.as_str(),
            config.dry_run,
        );

        for (index, file) in files.iter().enumerate() {
            let outcome = self.sync_one(file, config.dry_run).await;

            match &outcome {
                FileOutcome::Copied => info!("Copied {}", file.name),
                FileOutcome::WouldCopy => info!("Would copy {}", file.name),
                FileOutcome::SkippedExisting => debug!("{} already exists", file.name),
                FileOutcome::SkippedNotFile => debug!("{} is not a regular file", file.name),
                FileOutcome::Failed(reason) => warn!("{}: {}", file.name, reason),
            }

            let uploaded = outcome == FileOutcome::Copied;
            if uploaded {
                report.copied_bytes += file.size;
            }
            report.record(&file.name, outcome);

            // Pace uploads; nothing to wait for after the last file
            let has_more = index + 1 < files.len();
            if uploaded && has_more && config.upload_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(config.upload_delay_ms)).await;
            }
        }

        report.finish();
        report
    }

    async fn sync_one(&self, file: &SourceFile, dry_run: bool) -> FileOutcome {
        if !file.is_file {
            return FileOutcome::SkippedNotFile;
        }

        match self.remote_repository.file_exists(&file.name).await {
            Ok(true) => return FileOutcome::SkippedExisting,
            Ok(false) => {}
            Err(e) => return FileOutcome::Failed(format!("{:#}", e)),
        }

        if dry_run {
            return FileOutcome::WouldCopy;
        }

        info!("Copying {} ({} bytes)", file.name, file.size);
        let content = match self.source_repository.read_file(&file.path).await {
            Ok(content) => content,
            Err(e) => return FileOutcome::Failed(format!("{:#}", e)),
        };

        match self.remote_repository.upload_file(&file.name, content).await {
            Ok(()) => FileOutcome::Copied,
            Err(e) => FileOutcome::Failed(format!("{:#}", e)),
        }
    }
}
