//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **SourceFile**: 同期元フォルダのエントリ
//! - **SyncReport**: 同期結果のバリューオブジェクト

pub mod source_file;
pub mod sync_report;
