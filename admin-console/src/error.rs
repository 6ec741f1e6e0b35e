/// Fallback message when a failed envelope carries no message of its own
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// Error returned by every API call and store action.
///
/// Business errors come from a delivered envelope whose code is not 200.
/// The remaining variants describe transport-level failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Business { code: i64, message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("No response received: {0}")]
    NoResponse(String),

    #[error("Request configuration error: {0}")]
    Request(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Business code for envelope failures, HTTP status for transport failures
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Business { code, .. } => Some(*code),
            ApiError::Http { status, .. } => Some(i64::from(*status)),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Business { message, .. } | ApiError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// True when the session was rejected and the caller should route to login
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Business { code: 401, .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Failure while assembling a [`crate::console::Console`]
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_error_displays_envelope_message() {
        let err = ApiError::Business {
            code: 4001,
            message: "stream name taken".to_string(),
        };
        assert_eq!(err.to_string(), "stream name taken");
        assert_eq!(err.code(), Some(4001));
        assert!(!err.requires_login());
    }

    #[test]
    fn test_requires_login_only_for_business_401() {
        let business = ApiError::Business {
            code: 401,
            message: "expired".to_string(),
        };
        let http = ApiError::Http {
            status: 401,
            message: "expired".to_string(),
        };
        assert!(business.requires_login());
        assert!(!http.requires_login());
        assert_eq!(http.code(), Some(401));
    }
}
