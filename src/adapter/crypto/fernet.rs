//! Fernet Tokens
//!
//! 設定ファイルに保存するクライアントシークレットの暗号化・復号
//!
//! Token layout (URL-safe base64):
//! `0x80 | timestamp (u64 BE) | IV (16) | AES-128-CBC ciphertext | HMAC-SHA256 (32)`

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type HmacSha256 = Hmac<Sha256>;

const VERSION: u8 = 0x80;
const HEADER_LEN: usize = 1 + 8 + 16;
const MAC_LEN: usize = 32;
const BLOCK_LEN: usize = 16;

// Padding is optional on decode; some tools strip the trailing '='.
const URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FernetError {
    #[error("invalid Fernet key: {0}")]
    InvalidKey(String),
    #[error("invalid Fernet token: {0}")]
    InvalidToken(String),
    #[error("Fernet token signature does not match the key")]
    SignatureMismatch,
    #[error("failed to decrypt Fernet token")]
    Decrypt,
    #[error("decrypted value is not valid UTF-8")]
    Utf8,
}

/// Fernet key (signing half + encryption half)
pub struct Fernet {
    signing_key: [u8; 16],
    encryption_key: [u8; 16],
}

impl std::fmt::Debug for Fernet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Fernet { .. }")
    }
}

impl Fernet {
    /// Parse a 32-byte URL-safe base64 key
    pub fn new(key: &str) -> Result<Self, FernetError> {
        let bytes = URL_SAFE
            .decode(key.trim())
            .map_err(|e| FernetError::InvalidKey(e.to_string()))?;

        if bytes.len() != 32 {
            return Err(FernetError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let mut signing_key = [0u8; 16];
        let mut encryption_key = [0u8; 16];
        signing_key.copy_from_slice(&bytes[..16]);
        encryption_key.copy_from_slice(&bytes[16..]);

        Ok(Self {
            signing_key,
            encryption_key,
        })
    }

    /// Generate a fresh random key
    pub fn generate_key() -> String {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        URL_SAFE.encode(key)
    }

    /// Verify and decrypt a token. The embedded timestamp is not checked (no TTL).
    pub fn decrypt(&self, token: &str) -> Result<Vec<u8>, FernetError> {
        let data = URL_SAFE
            .decode(token.trim())
            .map_err(|e| FernetError::InvalidToken(e.to_string()))?;

        if data.len() < HEADER_LEN + BLOCK_LEN + MAC_LEN {
            return Err(FernetError::InvalidToken("token too short".to_string()));
        }
        if data[0] != VERSION {
            return Err(FernetError::InvalidToken(format!(
                "unsupported version 0x{:02x}",
                data[0]
            )));
        }
        if (data.len() - HEADER_LEN - MAC_LEN) % BLOCK_LEN != 0 {
            return Err(FernetError::InvalidToken(
                "ciphertext is not block aligned".to_string(),
            ));
        }

        let (signed, tag) = data.split_at(data.len() - MAC_LEN);
        self.mac()?
            .chain_update(signed)
            .verify_slice(tag)
            .map_err(|_| FernetError::SignatureMismatch)?;

        let mut iv = [0u8; 16];
        iv.copy_from_slice(&signed[9..HEADER_LEN]);
        let ciphertext = &signed[HEADER_LEN..];

        Aes128CbcDec::new((&self.encryption_key).into(), (&iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| FernetError::Decrypt)
    }

    /// Decrypt a token holding UTF-8 text
    pub fn decrypt_to_string(&self, token: &str) -> Result<String, FernetError> {
        String::from_utf8(self.decrypt(token)?).map_err(|_| FernetError::Utf8)
    }

    /// Encrypt with a random IV and the current time
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, FernetError> {
        let mut iv = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut iv);
        let timestamp = chrono::Utc::now().timestamp().max(0) as u64;
        self.encrypt_with_parts(plaintext, timestamp, iv)
    }

    pub(crate) fn encrypt_with_parts(
        &self,
        plaintext: &[u8],
        timestamp: u64,
        iv: [u8; 16],
    ) -> Result<String, FernetError> {
        let ciphertext = Aes128CbcEnc::new((&self.encryption_key).into(), (&iv).into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len() + MAC_LEN);
        token.push(VERSION);
        token.extend_from_slice(&timestamp.to_be_bytes());
        token.extend_from_slice(&iv);
        token.extend_from_slice(&ciphertext);

        let tag = self.mac()?.chain_update(&token).finalize().into_bytes();
        token.extend_from_slice(&tag);

        Ok(URL_SAFE.encode(token))
    }

    fn mac(&self) -> Result<HmacSha256, FernetError> {
        HmacSha256::new_from_slice(&self.signing_key)
            .map_err(|e| FernetError::InvalidKey(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Published Fernet test vector
    const REFERENCE_KEY: &str = "cw_0x689RpI-jtRR7oE8h_eQsKImvJapLeSbXpwF4e4=";
    const REFERENCE_TOKEN: &str = "gAAAAAAdwJ6wAAECAwQFBgcICQoLDA0ODy021cpGVWKZ_eEwCGM4BLLF_5CV9dOPmrhuVUPgJobwOz7JcbmrR64jVmpU4IwqDA==";

    fn iv() -> [u8; 16] {
        let mut iv = [0u8; 16];
        for (i, b) in iv.iter_mut().enumerate() {
            *b = i as u8;
        }
        iv
    }

    #[test]
    fn test_decrypt_reference_token() {
        let fernet = Fernet::new(REFERENCE_KEY).unwrap();
        assert_eq!(fernet.decrypt(REFERENCE_TOKEN).unwrap(), b"hello");
    }

    #[test]
    fn test_decrypt_without_padding() {
        let fernet = Fernet::new(REFERENCE_KEY).unwrap();
        let unpadded = REFERENCE_TOKEN.trim_end_matches('=');
        assert_eq!(fernet.decrypt_to_string(unpadded).unwrap(), "hello");
    }

    #[test]
    fn test_encrypt_matches_reference_implementation() {
        let fernet = Fernet::new(REFERENCE_KEY).unwrap();
        let token = fernet
            .encrypt_with_parts(b"app-secret-value", 499162800, iv())
            .unwrap();
        assert_eq!(
            token,
            "gAAAAAAdwJ6wAAECAwQFBgcICQoLDA0ODzc6JHE-zuYEiB6eME-lnnyfZa8NRulm_FTkrTZJglagl44CF6V_9RbYoztKJU80dLPBIZ_lRhQF5-ts1nW_fq8="
        );
    }

    #[test]
    fn test_encrypt_then_decrypt_with_generated_key() {
        let fernet = Fernet::new(&Fernet::generate_key()).unwrap();
        let token = fernet.encrypt(b"s3cr3t~value").unwrap();
        assert_eq!(fernet.decrypt_to_string(&token).unwrap(), "s3cr3t~value");
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let other = Fernet::new(&Fernet::generate_key()).unwrap();
        assert_eq!(
            other.decrypt(REFERENCE_TOKEN),
            Err(FernetError::SignatureMismatch)
        );
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let fernet = Fernet::new(REFERENCE_KEY).unwrap();
        let mut raw = URL_SAFE.decode(REFERENCE_TOKEN).unwrap();
        raw[30] ^= 0x01;
        let tampered = URL_SAFE.encode(raw);
        assert_eq!(fernet.decrypt(&tampered), Err(FernetError::SignatureMismatch));
    }

    #[test]
    fn test_malformed_tokens() {
        let fernet = Fernet::new(REFERENCE_KEY).unwrap();
        assert!(matches!(
            fernet.decrypt("not base64 !!"),
            Err(FernetError::InvalidToken(_))
        ));
        assert!(matches!(
            fernet.decrypt("gAAAAA=="),
            Err(FernetError::InvalidToken(_))
        ));

        let mut raw = URL_SAFE.decode(REFERENCE_TOKEN).unwrap();
        raw[0] = 0x81;
        assert!(matches!(
            fernet.decrypt(&URL_SAFE.encode(raw)),
            Err(FernetError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(Fernet::new("short"), Err(FernetError::InvalidKey(_))));
        assert!(matches!(
            Fernet::new(&URL_SAFE.encode([0u8; 16])),
            Err(FernetError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let fernet = Fernet::new(REFERENCE_KEY).unwrap();
        assert_eq!(format!("{:?}", fernet), "Fernet { .. }");
    }
}
