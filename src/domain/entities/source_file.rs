//! # SourceFile Entity
//!
//! 同期元フォルダ内のエントリを表すドメインエンティティ

use std::path::PathBuf;

/// 同期元ファイル
///
/// ソースフォルダ直下のエントリ。ディレクトリ等も含まれるため `is_file` で判別する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// ファイル名（SharePoint上のアイテム名にもなる）
    pub name: String,
    /// ローカルの絶対パス
    pub path: PathBuf,
    /// サイズ（バイト）
    pub size: u64,
    /// 通常ファイルかどうか
    pub is_file: bool,
}

impl SourceFile {
    /// 新しい通常ファイルのエントリを作成
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
            is_file: true,
        }
    }

    /// 通常ファイル以外（ディレクトリ等）のエントリを作成
    pub fn other(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size: 0,
            is_file: false,
        }
    }
}
