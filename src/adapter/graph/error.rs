//! Graph API Errors

use super::models::GraphErrorEnvelope;

pub type GraphResult<T> = Result<T, GraphError>;

/// Errors returned by the Graph adapter
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Token acquisition failed (bad credentials, unknown tenant, ...)
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from Graph
    #[error("Graph API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid Graph API response: {0}")]
    InvalidResponse(String),

    #[error("invalid SharePoint site URL '{url}': {reason}")]
    InvalidSiteUrl { url: String, reason: String },
}

impl GraphError {
    /// Build a status error from a Graph error body (`{"error":{"code","message"}}`)
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<GraphErrorEnvelope>(body) {
            Ok(envelope) => format!("{}: {}", envelope.error.code, envelope.error.message),
            Err(_) if body.trim().is_empty() => "empty response body".to_string(),
            Err(_) => body.chars().take(300).collect(),
        };

        GraphError::Status { status, message }
    }

    /// HTTP status if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            GraphError::Status { status, .. } => Some(*status),
            GraphError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_graph_error_body() {
        let body = r#"{"error":{"code":"accessDenied","message":"Access denied"}}"#;
        let err = GraphError::from_response(403, body);

        assert_eq!(err.status(), Some(403));
        assert_eq!(
            err.to_string(),
            "Graph API returned 403: accessDenied: Access denied"
        );
    }

    #[test]
    fn test_from_plain_body() {
        let err = GraphError::from_response(502, "Bad Gateway");
        assert_eq!(err.to_string(), "Graph API returned 502: Bad Gateway");
    }

    #[test]
    fn test_from_empty_body() {
        let err = GraphError::from_response(500, "  ");
        assert_eq!(err.to_string(), "Graph API returned 500: empty response body");
    }

    #[test]
    fn test_status_none_for_auth_error() {
        let err = GraphError::Authentication("invalid_client".to_string());
        assert_eq!(err.status(), None);
    }
}
