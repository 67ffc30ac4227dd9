//! Authentication Module
//!
//! Entra ID（Azure AD）認証関連の機能

pub mod client_credentials;

pub use client_credentials::{ClientCredentials, TokenProvider};
