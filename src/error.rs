use serde::{Deserialize, Serialize};

/// Message used when a request never produced an HTTP response.
pub const CONNECTION_ERROR_MESSAGE: &str = "Unable to connect to the API server";

#[derive(Debug, thiserror::Error)]
pub enum CostPlanError {
    /// No response reached us: DNS, refused connection, timeout, TLS.
    #[error("{message}")]
    Connection {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The server answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Http {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid month key: {0}")]
    InvalidMonth(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Simulation unavailable: {0}")]
    SimulationUnavailable(String),

    #[error("Month {0} is already budgeted")]
    DuplicateMonth(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl CostPlanError {
    /// Build an HTTP error from a status code and the server's own message.
    ///
    /// Well-known statuses get the fixed user-facing wording the dashboard
    /// shows; anything else surfaces the server message verbatim.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        let message = match status {
            401 => "Authentication failed. Please log in again.".to_string(),
            403 => "You do not have permission to access this resource.".to_string(),
            404 => "The requested resource was not found.".to_string(),
            s if s >= 500 => {
                "The server encountered an error. Please try again later.".to_string()
            }
            _ => detail
                .clone()
                .unwrap_or_else(|| "An error occurred".to_string()),
        };
        CostPlanError::Http {
            status,
            message,
            detail,
        }
    }

    /// HTTP status code, if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            CostPlanError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, CostPlanError::Connection { .. })
    }

    /// Convert into the cloneable, serializable form kept in view state.
    pub fn info(&self) -> ApiErrorInfo {
        let message = match self {
            CostPlanError::Connection { message, .. } => message.clone(),
            CostPlanError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        };
        ApiErrorInfo {
            message,
            status: self.status(),
            is_connection_error: self.is_connection_error(),
        }
    }
}

impl From<reqwest::Error> for CostPlanError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return CostPlanError::from_status(status.as_u16(), None);
        }
        if e.is_decode() {
            return CostPlanError::InvalidArgument(format!("Malformed response body: {e}"));
        }
        CostPlanError::Connection {
            message: CONNECTION_ERROR_MESSAGE.to_string(),
            source: Some(e),
        }
    }
}

/// Structured error surfaced to the user: `{ message, status, isConnectionError }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorInfo {
    pub message: String,
    pub status: Option<u16>,
    pub is_connection_error: bool,
}

impl std::fmt::Display for ApiErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {})", self.message, status),
            None => f.write_str(&self.message),
        }
    }
}

pub type Result<T> = std::result::Result<T, CostPlanError>;
