//! # SyncReport Value Object
//!
//! 同期処理の結果（コピー数・エラー数・ファイル毎の結果）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ファイル毎の処理結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum FileOutcome {
    /// アップロード済み
    Copied,
    /// dry-run のためアップロードしなかった
    WouldCopy,
    /// SharePoint上に既に存在する
    SkippedExisting,
    /// 通常ファイルではない
    SkippedNotFile,
    /// 失敗（エラーメッセージ）
    Failed(String),
}

/// ファイル名と結果の組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// 同期レポート
///
/// 1回の実行で処理した全ファイルの集計
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub run_id: String,
    pub hostname: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub source_folder: String,
    pub library: String,
    pub dry_run: bool,
    pub copied: usize,
    pub errors: usize,
    pub skipped_existing: usize,
    pub skipped_not_file: usize,
    /// アップロードしたバイト数の合計
    #[serde(default)]
    pub copied_bytes: u64,
    pub copied_files: Vec<String>,
    pub files: Vec<FileRecord>,
}

impl SyncReport {
    /// 空のレポートを作成
    pub fn new(
        run_id: impl Into<String>,
        hostname: impl Into<String>,
        source_folder: impl Into<String>,
        library: impl Into<String>,
        dry_run: bool,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            hostname: hostname.into(),
            started_at: Utc::now(),
            finished_at: None,
            source_folder: source_folder.into(),
            library: library.into(),
            dry_run,
            copied: 0,
            errors: 0,
            skipped_existing: 0,
            skipped_not_file: 0,
            copied_bytes: 0,
            copied_files: Vec::new(),
            files: Vec::new(),
        }
    }

    /// ファイルの結果を記録し、カウンタを更新する
    pub fn record(&mut self, name: &str, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Copied => {
                self.copied += 1;
                self.copied_files.push(name.to_string());
            }
            FileOutcome::WouldCopy => {}
            FileOutcome::SkippedExisting => self.skipped_existing += 1,
            FileOutcome::SkippedNotFile => self.skipped_not_file += 1,
            FileOutcome::Failed(_) => self.errors += 1,
        }

        self.files.push(FileRecord {
            name: name.to_string(),
            outcome,
        });
    }

    /// 処理終了時刻を記録
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// dry-run でアップロード対象になったファイル名
    pub fn pending_files(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| f.outcome == FileOutcome::WouldCopy)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// エラーなしで完了したか
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SyncReport {
        SyncReport::new("run-001", "test-host", "/data", "Documents", false)
    }

    #[test]
    fn test_new_report_is_empty() {
        let report = report();
        assert_eq!(report.copied, 0);
        assert_eq!(report.errors, 0);
        assert!(report.copied_files.is_empty());
        assert!(report.finished_at.is_none());
        assert!(report.is_clean());
    }

    #[test]
    fn test_record_updates_counters() {
        let mut report = report();
        report.record("a.xml", FileOutcome::Copied);
        report.record("b.xml", FileOutcome::SkippedExisting);
        report.record("c.xml", FileOutcome::Failed("boom".to_string()));
        report.record("dir.xml", FileOutcome::SkippedNotFile);
        report.record("d.xml", FileOutcome::WouldCopy);

        assert_eq!(report.copied, 1);
        assert_eq!(report.skipped_existing, 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.skipped_not_file, 1);
        assert_eq!(report.copied_files, vec!["a.xml".to_string()]);
        assert_eq!(report.files.len(), 5);
        assert_eq!(report.pending_files(), vec!["d.xml"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_finish_sets_timestamp() {
        let mut report = report();
        report.finish();
        assert!(report.finished_at.is_some());
    }

    #[test]
    fn test_serialized_outcome_shape() {
        let record = FileRecord {
            name: "a.xml".to_string(),
            outcome: FileOutcome::Failed("HTTP 500".to_string()),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "a.xml");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["detail"], "HTTP 500");
    }
}
