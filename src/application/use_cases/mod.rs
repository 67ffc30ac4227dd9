//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **DiscoverFilesUseCase**: 同期元フォルダからアップロード対象を選別
//! - **SyncFilesUseCase**: 存在確認とアップロード、結果の集計

pub mod discover_files;
pub mod sync_files;
