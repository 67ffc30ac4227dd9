//! Helper Commands
//!
//! 設定ファイル用のシークレット暗号化と鍵生成

use anyhow::{Context, Result};

use crate::adapter::crypto::Fernet;

/// Encrypt `value` into a token for the `[SHAREPOINT] password` entry
pub fn encrypt_secret(secret_key: Option<&str>, value: &str) -> Result<String> {
    let key = secret_key
        .filter(|k| !k.trim().is_empty())
        .context("A secret key is required (use --secret-key or SPSYNC_SECRET_KEY)")?;

    let fernet = Fernet::new(key).context("Invalid secret key")?;
    fernet
        .encrypt(value.as_bytes())
        .context("Failed to encrypt the secret")
}

/// New random key
pub fn generate_key() -> String {
    Fernet::generate_key()
}
