//! Failure classification policy.
//!
//! Both functions are pure: they decide which notice to show, whether the
//! session must be dropped and what goes into the error log. The client
//! carries out those effects.

use crate::error::{ApiError, DEFAULT_FAILURE_MESSAGE};
use crate::notice::{Notice, NoticeAction};

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";
pub const NO_RESPONSE_MESSAGE: &str = "Network connection failed, please check your network settings";
pub const REQUEST_SETUP_MESSAGE: &str = "Request configuration error";

/// How the transport failed before a usable envelope arrived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// Server answered with a non-2xx status
    Status {
        status: u16,
        /// `message` field of the error body, when it had one
        body_message: Option<String>,
        reason: String,
    },
    /// Request was sent but nothing came back (connect failure, timeout)
    NoResponse { reason: String },
    /// Request could not be built or sent at all
    Other { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub notice: Notice,
    pub clear_session: bool,
    pub log_line: Option<String>,
}

impl Classification {
    fn notice(notice: Notice) -> Self {
        Self {
            notice,
            clear_session: false,
            log_line: None,
        }
    }
}

/// Envelope delivered with a code other than 200
pub fn classify_business(code: i64, message: Option<&str>) -> Classification {
    match code {
        401 => Classification {
            notice: Notice::warning(SESSION_EXPIRED_MESSAGE).with_action(NoticeAction::ReLogin),
            clear_session: true,
            log_line: None,
        },
        403 => Classification::notice(Notice::warning(
            "You do not have permission to access this resource",
        )),
        404 => Classification::notice(Notice::warning("The requested resource does not exist")),
        500 => Classification::notice(Notice::error("Internal server error")),
        _ => Classification::notice(Notice::error(failure_message(message))),
    }
}

pub fn classify_network(failure: &TransportFailure) -> Classification {
    match failure {
        TransportFailure::Status {
            status,
            body_message,
            reason,
        } => {
            let text = match status {
                400 => body_message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or("Invalid request parameters")
                    .to_string(),
                401 => "Unauthorized, please log in again".to_string(),
                403 => "Access forbidden".to_string(),
                404 => "Requested resource not found".to_string(),
                500 => "Internal server error".to_string(),
                502 => "Bad gateway".to_string(),
                503 => "Service unavailable".to_string(),
                504 => "Gateway timeout".to_string(),
                other => format!("Request failed: {}", other),
            };
            let detail = body_message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(reason);
            Classification {
                notice: Notice::error(text),
                clear_session: false,
                log_line: Some(format!("HTTP {}: {}", status, detail)),
            }
        }
        TransportFailure::NoResponse { .. } => Classification {
            notice: Notice::error(NO_RESPONSE_MESSAGE),
            clear_session: false,
            log_line: Some("Network Error: No response received".to_string()),
        },
        TransportFailure::Other { reason } => Classification {
            notice: Notice::error(REQUEST_SETUP_MESSAGE),
            clear_session: false,
            log_line: Some(format!("Request Error: {}", reason)),
        },
    }
}

/// Body message, or the fixed fallback when it is absent or blank
pub fn failure_message(message: Option<&str>) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(DEFAULT_FAILURE_MESSAGE)
        .to_string()
}

impl TransportFailure {
    pub fn into_error(self, classification: &Classification) -> ApiError {
        match self {
            TransportFailure::Status { status, .. } => ApiError::Http {
                status,
                message: classification.notice.message.clone(),
            },
            TransportFailure::NoResponse { reason } => ApiError::NoResponse(reason),
            TransportFailure::Other { reason } => ApiError::Request(reason),
        }
    }
}
