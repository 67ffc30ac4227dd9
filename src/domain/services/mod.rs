//! # Domain Services
//!
//! エンティティに属さないビジネスルール

pub mod file_selection;
