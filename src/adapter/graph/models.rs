//! Graph API Wire Models
//!
//! Microsoft Graph / Entra ID のリクエスト・レスポンス型

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::error::{GraphError, GraphResult};

/// Token endpoint success response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Token endpoint error response
#[derive(Debug, Default, Deserialize)]
pub struct TokenErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Bearer token with optional expiry
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl AccessToken {
    // Refresh a minute before the real expiry
    const EXPIRY_MARGIN_SECS: i64 = 60;

    pub fn new(secret: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    pub fn from_response(response: TokenResponse) -> Self {
        let expires_at = response
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        Self::new(response.access_token, expires_at)
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// A token without an expiry never needs a refresh
    pub fn is_expiring(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - Duration::seconds(Self::EXPIRY_MARGIN_SECS) <= now,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Document library
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drive {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub web_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DriveCollection {
    #[serde(default)]
    pub value: Vec<Drive>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub web_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GraphErrorEnvelope {
    pub error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct GraphErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// SharePoint site addressed by hostname and server-relative path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteAddress {
    pub hostname: String,
    pub server_relative_path: String,
}

impl SiteAddress {
    /// Parse `https://contoso.sharepoint.com/sites/Operations`
    pub fn from_url(raw: &str) -> GraphResult<Self> {
        let invalid = |reason: &str| GraphError::InvalidSiteUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let parsed = url::Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
        if parsed.scheme() != "https" {
            return Err(invalid("scheme must be https"));
        }
        let hostname = parsed
            .host_str()
            .ok_or_else(|| invalid("missing host"))?
            .to_string();

        let path = parsed.path().trim_end_matches('/');
        let server_relative_path = if path.is_empty() {
            String::new()
        } else {
            urlencoding::decode(path)
                .map_err(|e| invalid(&e.to_string()))?
                .into_owned()
        };

        Ok(Self {
            hostname,
            server_relative_path,
        })
    }

    /// Graph resource path (`sites/{host}:{path}` or `sites/{host}` for the root site)
    pub fn graph_path(&self) -> String {
        if self.server_relative_path.is_empty() {
            format!("sites/{}", self.hostname)
        } else {
            let encoded: Vec<String> = self
                .server_relative_path
                .split('/')
                .map(|segment| urlencoding::encode(segment).into_owned())
                .collect();
            format!("sites/{}:{}", self.hostname, encoded.join("/"))
        }
    }
}

impl std::fmt::Display for SiteAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.hostname, self.server_relative_path)
    }
}

/// Percent-encode a drive item path, one segment at a time
pub fn encode_item_path(folder: Option<&str>, name: &str) -> String {
    folder
        .unwrap_or_default()
        .split('/')
        .chain(std::iter::once(name))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_address_from_url() {
        let site = SiteAddress::from_url("https://contoso.sharepoint.com/sites/Operations/").unwrap();
        assert_eq!(site.hostname, "contoso.sharepoint.com");
        assert_eq!(site.server_relative_path, "/sites/Operations");
        assert_eq!(site.graph_path(), "sites/contoso.sharepoint.com:/sites/Operations");
    }

    #[test]
    fn test_site_address_root_site() {
        let site = SiteAddress::from_url("https://contoso.sharepoint.com").unwrap();
        assert_eq!(site.server_relative_path, "");
        assert_eq!(site.graph_path(), "sites/contoso.sharepoint.com");
    }

    #[test]
    fn test_site_address_with_spaces() {
        let site = SiteAddress::from_url("https://contoso.sharepoint.com/sites/Field%20Ops").unwrap();
        assert_eq!(site.server_relative_path, "/sites/Field Ops");
        assert_eq!(
            site.graph_path(),
            "sites/contoso.sharepoint.com:/sites/Field%20Ops"
        );
    }

    #[test]
    fn test_site_address_rejects_http_and_garbage() {
        assert!(SiteAddress::from_url("http://contoso.sharepoint.com/sites/x").is_err());
        assert!(SiteAddress::from_url("not a url").is_err());
    }

    #[test]
    fn test_encode_item_path_root() {
        assert_eq!(encode_item_path(None, "driver 01.xml"), "driver%2001.xml");
        assert_eq!(encode_item_path(Some(""), "a#b.xml"), "a%23b.xml");
    }

    #[test]
    fn test_encode_item_path_with_folder() {
        assert_eq!(
            encode_item_path(Some("/Imports/2024 Q1/"), "ORSTUP.txt"),
            "Imports/2024%20Q1/ORSTUP.txt"
        );
    }

    #[test]
    fn test_access_token_expiry() {
        let now = Utc::now();
        let fresh = AccessToken::new("t", Some(now + Duration::seconds(3600)));
        let stale = AccessToken::new("t", Some(now + Duration::seconds(30)));
        let eternal = AccessToken::new("t", None);

        assert!(!fresh.is_expiring(now));
        assert!(stale.is_expiring(now));
        assert!(!eternal.is_expiring(now));
    }

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("super-secret", None);
        assert!(!format!("{:?}", token).contains("super-secret"));
    }

    #[test]
    fn test_drive_collection_parsing() {
        let body = r#"{
            "value": [
                {"id": "b!1", "name": "Documents", "webUrl": "https://x/Shared%20Documents"},
                {"id": "b!2", "name": "Drivers"}
            ],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/next"
        }"#;
        let drives: DriveCollection = serde_json::from_str(body).unwrap();
        assert_eq!(drives.value.len(), 2);
        assert_eq!(drives.value[1].name, "Drivers");
        assert_eq!(
            drives.next_link.as_deref(),
            Some("https://graph.microsoft.com/v1.0/next")
        );
    }
}
