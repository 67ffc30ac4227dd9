//! Configuration
//!
//! INI 形式の設定ファイル読み込みとクライアントシークレットの復号

use anyhow::{bail, ensure, Context, Result};
use ini::{Ini, ParseOption};
use log::info;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapter::auth::client_credentials::{DEFAULT_AUTHORITY_URL, DEFAULT_GRAPH_SCOPE};
use crate::adapter::crypto::Fernet;
use crate::adapter::graph::client::DEFAULT_GRAPH_URL;
use crate::adapter::graph::models::SiteAddress;
use crate::adapter::graph::retry::DEFAULT_MAX_RETRIES;

pub const DEFAULT_CONFIG_FILE: &str = "tools_XML.ini";
pub const DEFAULT_LIBRARY: &str = "Documents";
pub const DEFAULT_UPLOAD_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const DEFAULT_SECTION: &str = "default";

/// INI content as read from disk
///
/// Values are kept verbatim (no escape or quote processing) so Windows paths
/// such as `C:\Data\Drivers` survive. Section and key names are lower-cased.
/// Keys missing from a section fall back to `[DEFAULT]`.
#[derive(Debug, Default)]
struct RawIni {
    sections: HashMap<String, HashMap<String, String>>,
}

impl RawIni {
    fn parse(content: &str) -> Result<Self> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..Default::default()
        };
        let ini = Ini::load_from_str_opt(content, options).context("Failed to parse INI")?;

        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        for (section, properties) in ini.iter() {
            // Keys above the first section header have no section to belong to
            let Some(section) = section else { continue };
            let entries = sections.entry(section.trim().to_lowercase()).or_default();
            for (key, value) in properties.iter() {
                entries.insert(key.trim().to_lowercase(), value.to_string());
            }
        }

        Ok(Self { sections })
    }

    fn get(&self, section: &str, key: &str) -> Option<String> {
        let lookup = |name: &str| self.sections.get(name).and_then(|s| s.get(key)).cloned();
        lookup(section).or_else(|| lookup(DEFAULT_SECTION))
    }
}

/// SharePoint connection settings
#[derive(Clone)]
pub struct SharePointSettings {
    pub url: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub library: String,
    pub folder: Option<String>,
    pub graph_url: String,
    pub authority_url: String,
    pub scope: String,
}

impl std::fmt::Debug for SharePointSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharePointSettings")
            .field("url", &self.url)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("library", &self.library)
            .field("folder", &self.folder)
            .field("graph_url", &self.graph_url)
            .field("authority_url", &self.authority_url)
            .field("scope", &self.scope)
            .finish()
    }
}

impl SharePointSettings {
    /// Site hostname and path derived from `url`
    pub fn site_address(&self) -> Result<SiteAddress> {
        SiteAddress::from_url(&self.url).map_err(anyhow::Error::from)
    }
}

/// File selection and pacing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub extensions: Vec<String>,
    pub name_patterns: Vec<String>,
    pub upload_delay_ms: u64,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            name_patterns: vec!["ORSTUP".to_string(), "ORSTUL".to_string()],
            upload_delay_ms: DEFAULT_UPLOAD_DELAY_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source_folder: PathBuf,
    pub sharepoint: SharePointSettings,
    pub sync: SyncSettings,
}

impl Config {
    /// Load an INI file and decrypt the client secret with `secret_key`
    pub fn load(path: &Path, secret_key: Option<&str>) -> Result<Self> {
        info!("Configuration file: {}", path.display());

        if !path.exists() {
            bail!("Configuration file not found: {}", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        Self::from_ini_str(&content, secret_key)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Parse INI content
    pub fn from_ini_str(content: &str, secret_key: Option<&str>) -> Result<Self> {
        let raw = RawIni::parse(content)?;
        let sharepoint = |key: &str| non_empty(raw.get("sharepoint", key));
        let sync = |key: &str| non_empty(raw.get("sync", key));

        let source_folder = non_empty(raw.get(DEFAULT_SECTION, "source_folder"))
            .context("The source folder (source_folder) is not set in [DEFAULT]")?;
        info!("Source folder from configuration: {}", source_folder);

        let client_secret = match sharepoint("password") {
            Some(token) => decrypt_secret(&token, secret_key)?,
            None => String::new(),
        };

        let defaults = SyncSettings::default();

        Ok(Self {
            source_folder: absolute_path(&source_folder)?,
            sharepoint: SharePointSettings {
                url: sharepoint("url").unwrap_or_default(),
                tenant_id: sharepoint("tenant_id").unwrap_or_default(),
                client_id: sharepoint("username").unwrap_or_default(),
                client_secret,
                library: sharepoint("library").unwrap_or_else(|| DEFAULT_LIBRARY.to_string()),
                folder: sharepoint("folder"),
                graph_url: sharepoint("graph_url").unwrap_or_else(|| DEFAULT_GRAPH_URL.to_string()),
                authority_url: sharepoint("authority_url")
                    .unwrap_or_else(|| DEFAULT_AUTHORITY_URL.to_string()),
                scope: sharepoint("scope").unwrap_or_else(|| DEFAULT_GRAPH_SCOPE.to_string()),
            },
            sync: SyncSettings {
                extensions: match sync("extensions") {
                    Some(list) => split_list(&list),
                    None => defaults.extensions,
                },
                name_patterns: match sync("name_patterns") {
                    Some(list) => split_list(&list),
                    None => defaults.name_patterns,
                },
                upload_delay_ms: parse_number(sync("upload_delay_ms"), "upload_delay_ms")?
                    .unwrap_or(defaults.upload_delay_ms),
                max_retries: parse_number(sync("max_retries"), "max_retries")?
                    .unwrap_or(defaults.max_retries),
                timeout_secs: parse_number(sync("timeout_secs"), "timeout_secs")?
                    .unwrap_or(defaults.timeout_secs),
            },
        })
    }

    /// Check everything a sync run needs
    pub fn validate(&self) -> Result<()> {
        let sp = &self.sharepoint;
        ensure!(!sp.url.is_empty(), "[SHAREPOINT] url is not set");
        ensure!(!sp.tenant_id.is_empty(), "[SHAREPOINT] tenant_id is not set");
        ensure!(
            !sp.client_id.is_empty(),
            "[SHAREPOINT] username (application client id) is not set"
        );
        ensure!(
            !sp.client_secret.is_empty(),
            "[SHAREPOINT] password (encrypted client secret) is not set"
        );
        ensure!(!sp.library.is_empty(), "[SHAREPOINT] library is empty");
        ensure!(self.sync.timeout_secs > 0, "[SYNC] timeout_secs must be positive");
        sp.site_address()?;
        Ok(())
    }
}

/// Resolve the configuration path: absolute as given, else the working
/// directory, else the directory of the running executable.
pub fn resolve_config_path(name: &str) -> PathBuf {
    let path = PathBuf::from(shellexpand::tilde(name).as_ref());
    if path.is_absolute() || path.exists() {
        return path;
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&path)));

    match beside_exe {
        Some(candidate) if candidate.exists() => candidate,
        _ => path,
    }
}

fn decrypt_secret(token: &str, secret_key: Option<&str>) -> Result<String> {
    let key = secret_key.filter(|k| !k.trim().is_empty()).context(
        "The SharePoint client secret is encrypted but no secret key was given \
         (use --secret-key or SPSYNC_SECRET_KEY)",
    )?;

    Fernet::new(key)
        .and_then(|fernet| fernet.decrypt_to_string(token))
        .context("Failed to decrypt the SharePoint client secret")
}

fn absolute_path(raw: &str) -> Result<PathBuf> {
    let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
    if expanded.is_absolute() {
        return Ok(expanded);
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(expanded))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(value: Option<String>, key: &str) -> Result<Option<T>> {
    match non_empty(value) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("[SYNC] {} must be a number, got '{}'", key, raw)),
        None => Ok(None),
    }
}
