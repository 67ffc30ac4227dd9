//! Repository Implementations
//!
//! Domain層のRepositoryトレイトの実装

pub mod file_source_repository;
pub mod graph_drive_repository;
pub mod json_report_repository;
