//! Entra ID Authentication
//!
//! OAuth2 client credentials フローによるアクセストークン取得

use chrono::Utc;
use log::{debug, info};
use tokio::sync::Mutex;

use crate::adapter::graph::error::{GraphError, GraphResult};
use crate::adapter::graph::models::{AccessToken, TokenErrorResponse, TokenResponse};

pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Service principal credentials for the client credentials grant
#[derive(Clone)]
pub struct ClientCredentials {
    http: reqwest::Client,
    authority_url: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("authority_url", &self.authority_url)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

impl ClientCredentials {
    pub fn new(
        http: reqwest::Client,
        authority_url: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            http,
            authority_url: authority_url.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: scope.into(),
        }
    }

    /// `{authority}/{tenant}/oauth2/v2.0/token`
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_url.trim_end_matches('/'),
            urlencoding::encode(&self.tenant_id)
        )
    }

    /// Request a new access token from the token endpoint
    pub async fn acquire_token(&self) -> GraphResult<AccessToken> {
        let token_url = self.token_url();
        debug!("Requesting access token from {}", token_url);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self.http.post(&token_url).form(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            let reason = error
                .error_description
                .or(error.error)
                .unwrap_or_else(|| format!("{} {}", status.as_u16(), body.trim()));
            return Err(GraphError::Authentication(reason));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| GraphError::InvalidResponse(format!("token response: {}", e)))?;

        info!(
            "Access token acquired (type: {}, expires in: {}s)",
            token.token_type.as_deref().unwrap_or("Bearer"),
            token.expires_in.unwrap_or_default()
        );

        Ok(AccessToken::from_response(token))
    }
}

/// Caches the access token and renews it shortly before it expires
pub struct TokenProvider {
    credentials: Option<ClientCredentials>,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(credentials: ClientCredentials) -> Self {
        Self {
            credentials: Some(credentials),
            cached: Mutex::new(None),
        }
    }

    /// Provider that always hands out the same token
    pub fn with_static(token: AccessToken) -> Self {
        Self {
            credentials: None,
            cached: Mutex::new(Some(token)),
        }
    }

    /// Current bearer token, acquiring a new one when needed
    pub async fn token(&self) -> GraphResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if self.credentials.is_none() || !token.is_expiring(Utc::now()) {
                return Ok(token.secret().to_string());
            }
            info!("Access token is about to expire, renewing");
        }

        let credentials = self.credentials.as_ref().ok_or_else(|| {
            GraphError::Authentication("no client credentials configured".to_string())
        })?;

        let token = credentials.acquire_token().await?;
        let secret = token.secret().to_string();
        *cached = Some(token);

        Ok(secret)
    }
}
