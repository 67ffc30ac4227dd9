//! Adapter Layer
//!
//! 外部システム（SharePoint / Graph API, ファイルシステム）との統合

pub mod auth;
pub mod config;
pub mod crypto;
pub mod graph;
pub mod repositories;
