//! # Application Errors
//!
//! 実行全体を失敗させるエラー

use thiserror::Error;

/// 同期実行の失敗
///
/// ファイル単位のエラーはレポートに記録されるためここには含まれない
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("No eligible file found in {folder}")]
    NoEligibleFiles { folder: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Library '{name}' not found. Available libraries: {}", .available.join(", "))]
    LibraryNotFound {
        name: String,
        available: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_not_found_lists_available() {
        let err = SyncError::LibraryNotFound {
            name: "Drivers".to_string(),
            available: vec!["Documents".to_string(), "Archive".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Library 'Drivers' not found. Available libraries: Documents, Archive"
        );
    }

    #[test]
    fn test_no_eligible_files_message() {
        let err = SyncError::NoEligibleFiles {
            folder: "/srv/drivers".to_string(),
        };
        assert!(err.to_string().contains("/srv/drivers"));
    }
}
