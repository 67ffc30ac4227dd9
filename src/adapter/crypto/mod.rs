//! Secret Encryption
//!
//! クライアントシークレットの暗号化・復号機能

pub mod fernet;

pub use fernet::{Fernet, FernetError};
