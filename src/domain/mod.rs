//! # Domain Layer
//!
//! このモジュールはビジネスの核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - 外部依存を持たない（Rust標準ライブラリと最小限の依存のみ）
//! - フレームワークに依存しない
//! - SharePoint や Graph API について何も知らない
//! - 純粋なビジネスロジック
//!
//! ## 構成要素
//!
//! - **entities**: ビジネスエンティティ（SourceFile, SyncReportなど）
//! - **repositories**: Repository trait（インターフェース定義のみ）
//! - **services**: Domain Service（ファイル選別ルール）

pub mod entities;
pub mod repositories;
pub mod services;
