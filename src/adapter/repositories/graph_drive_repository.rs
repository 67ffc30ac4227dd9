//! Graph Drive Repository Implementation
//!
//! RemoteDriveRepositoryのSharePoint（Graph API）実装

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::adapter::graph::client::GraphClient;
use crate::adapter::graph::error::GraphError;
use crate::adapter::graph::models::{encode_item_path, Drive, SiteAddress};
use crate::domain::repositories::remote_drive_repository::RemoteDriveRepository;

/// サイト・ライブラリの解決に失敗した理由
#[derive(Debug, thiserror::Error)]
pub enum DriveConnectError {
    #[error("SharePoint site not found: {0}")]
    SiteNotFound(String),

    #[error("SharePoint site {0} returned no id")]
    MissingSiteId(String),

    #[error("library '{name}' not found on the site")]
    LibraryNotFound { name: String, available: Vec<Drive> },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// 接続済みのドキュメントライブラリ
pub struct GraphDriveRepository {
    client: Arc<GraphClient>,
    site_id: String,
    drive_id: String,
    folder: Option<String>,
}

impl GraphDriveRepository {
    /// サイトとライブラリを解決して接続する
    ///
    /// # Arguments
    ///
    /// * `client` - Graph APIクライアント
    /// * `site` - サイトのホスト名とパス
    /// * `library` - ライブラリ名（完全一致）
    /// * `folder` - ライブラリ内のアップロード先フォルダ（`None`ならルート）
    pub async fn connect(
        client: Arc<GraphClient>,
        site: &SiteAddress,
        library: &str,
        folder: Option<String>,
    ) -> Result<Self, DriveConnectError> {
        let site_info = client
            .get_site(site)
            .await?
            .ok_or_else(|| DriveConnectError::SiteNotFound(site.to_string()))?;

        let site_id = site_info
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DriveConnectError::MissingSiteId(site.to_string()))?;
        info!("Site ID: {}", site_id);

        let drives = client.list_drives(&site_id).await?;
        let drive_id = match drives.iter().find(|d| d.name == library) {
            Some(drive) => drive.id.clone(),
            None => {
                return Err(DriveConnectError::LibraryNotFound {
                    name: library.to_string(),
                    available: drives,
                })
            }
        };
        info!("Library '{}' found (ID: {})", library, drive_id);

        Ok(Self {
            client,
            site_id,
            drive_id,
            folder,
        })
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    fn item_path(&self, name: &str) -> String {
        encode_item_path(self.folder.as_deref(), name)
    }
}

#[async_trait]
impl RemoteDriveRepository for GraphDriveRepository {
    async fn file_exists(&self, name: &str) -> Result<bool> {
        self.client
            .item_exists(&self.site_id, &self.drive_id, &self.item_path(name))
            .await
            .with_context(|| format!("Failed to check whether '{}' exists", name))
    }

    async fn upload_file(&self, name: &str, content: Vec<u8>) -> Result<()> {
        let item = self
            .client
            .upload_content(&self.site_id, &self.drive_id, &self.item_path(name), content)
            .await
            .with_context(|| format!("Failed to upload '{}'", name))?;

        log::debug!(
            "Uploaded {} as item {}",
            name,
            item.id.as_deref().unwrap_or("?")
        );
        Ok(())
    }
}
