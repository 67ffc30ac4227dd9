//! Microsoft Graph Adapter Modules
//!
//! SharePoint（Graph API）統合のためのアダプターモジュール

pub mod client;
pub mod error;
pub mod models;
pub mod retry;
