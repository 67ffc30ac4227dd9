//! File Source Repository Implementation
//!
//! SourceRepositoryのファイルシステム実装

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::entities::source_file::SourceFile;
use crate::domain::repositories::source_repository::SourceRepository;

/// ファイルシステムベースのソースリポジトリ
pub struct FileSourceRepository;

impl FileSourceRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// フォルダ直下のエントリを列挙する（内部実装）
    fn list_entries_internal(folder: &Path) -> Result<Vec<SourceFile>> {
        if !folder.exists() {
            warn!(
                "Source folder does not exist, creating it: {}",
                folder.display()
            );
            fs::create_dir_all(folder).with_context(|| {
                format!("Failed to create source folder: {}", folder.display())
            })?;
        }

        let mut entries = Vec::new();

        for entry in WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", folder.display(), e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path().to_path_buf();

            if entry.file_type().is_file() {
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                entries.push(SourceFile::file(name, path, size));
            } else {
                entries.push(SourceFile::other(name, path));
            }
        }

        info!(
            "Found {} entries in {}",
            entries.len(),
            folder.display()
        );

        Ok(entries)
    }

    fn read_file_internal(path: &PathBuf) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }
}

#[async_trait]
impl SourceRepository for FileSourceRepository {
    async fn list_entries(&self, folder: &Path) -> Result<Vec<SourceFile>> {
        let folder = folder.to_path_buf();
        tokio::task::spawn_blocking(move || Self::list_entries_internal(&folder))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::read_file_internal(&path))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }
}

impl Default for FileSourceRepository {
    fn default() -> Self {
        Self::new()
    }
}
