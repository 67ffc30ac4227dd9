//! # Remote Drive Repository Trait
//!
//! SharePoint ドキュメントライブラリ（Drive）への操作を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// リモートドライブリポジトリ
///
/// 接続済みのライブラリに対して、存在確認とアップロードを行う
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteDriveRepository: Send + Sync {
    /// 同名のファイルが既に存在するか確認する
    ///
    /// # Errors
    ///
    /// 存在確認自体に失敗した場合（404以外のエラー応答、通信エラー）
    async fn file_exists(&self, name: &str) -> Result<bool>;

    /// ファイルをアップロードする
    ///
    /// # Errors
    ///
    /// アップロードに失敗した場合にエラーを返す
    async fn upload_file(&self, name: &str, content: Vec<u8>) -> Result<()>;
}
