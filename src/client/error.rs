//! Client error types.
//!
//! Distinguishes the server rejecting a request (non-2xx status) from a response
//! that arrived but does not match the expected schema.

/// Error from budget API calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a status outside 2xx.
    #[error("Remote error (HTTP {status}): {body}")]
    Remote { status: u16, body: String },

    /// The response body is not the `{"data": ...}` shape the endpoint promises.
    #[error("Schema error from {endpoint}: {message}")]
    Schema { endpoint: String, message: String },

    /// Connection failed, timed out, or the body could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured host is not an absolute http(s) URL without query or fragment.
    #[error("Invalid host {0:?}")]
    InvalidHost(String),

    /// The API key cannot be sent as an HTTP header value.
    #[error("Invalid API key: not a valid header value")]
    InvalidApiKey,

    /// The budget sync id is empty.
    #[error("Invalid budget sync id {0:?}")]
    InvalidBudgetId(String),
}

impl ClientError {
    pub(crate) fn schema(endpoint: &str, message: impl Into<String>) -> Self {
        ClientError::Schema {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status code, if the server answered with an error status.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::Remote { .. })
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, ClientError::Schema { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_carries_status_and_body() {
        let err = ClientError::Remote {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.status(), Some(500));
        assert!(err.is_remote());
        assert!(!err.is_schema());
        assert_eq!(err.to_string(), "Remote error (HTTP 500): boom");
    }

    #[test]
    fn schema_error_has_no_status() {
        let err = ClientError::schema("GET /accounts", "missing field `data`");
        assert_eq!(err.status(), None);
        assert!(err.is_schema());
        assert_eq!(
            err.to_string(),
            "Schema error from GET /accounts: missing field `data`"
        );
    }

    #[test]
    fn construction_errors_have_no_status() {
        let key = ClientError::InvalidApiKey;
        let budget = ClientError::InvalidBudgetId(" ".to_string());
        assert_eq!(key.status(), None);
        assert_eq!(budget.status(), None);
        assert_eq!(budget.to_string(), "Invalid budget sync id \" \"");
    }
}
