use thiserror::Error;

/// Errors that can occur while talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error during {operation}: {message}")]
    Network { operation: String, message: String },

    #[error("API error during {operation} ({status}): {message}")]
    Api {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Failed to parse response for {operation}: {message}")]
    Parse { operation: String, message: String },

    #[error("Response for {0} carried no GUID")]
    MissingGuid(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl CatalogError {
    pub fn network(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        CatalogError::Network {
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    pub fn parse(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        CatalogError::Parse {
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
