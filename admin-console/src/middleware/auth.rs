use reqwest::header::{HeaderValue, AUTHORIZATION};

use super::{OutgoingRequest, RequestInterceptor};
use crate::error::{ApiError, Result};
use crate::session::SessionHandle;

/// Attaches `Authorization: Bearer <token>` when a session token is present
#[derive(Debug, Clone)]
pub struct BearerAuth {
    session: SessionHandle,
}

impl BearerAuth {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }
}

impl RequestInterceptor for BearerAuth {
    fn name(&self) -> &'static str {
        "bearer-auth"
    }

    fn intercept(&self, request: &mut OutgoingRequest) -> Result<()> {
        let Some(token) = self.session.token() else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::Request("session token is not a valid header value".into()))?;
        value.set_sensitive(true);
        request.headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;

    use super::*;
    use crate::http::InFlightTracker;
    use crate::session::Session;
    use crate::storage::MemoryStore;

    fn request() -> OutgoingRequest {
        let tracker = InFlightTracker::new();
        let guard = tracker.begin();
        OutgoingRequest::new(guard.id(), Method::GET, "/api/v1/auth/userinfo")
    }

    #[test]
    fn test_no_token_leaves_headers_untouched() {
        let session = SessionHandle::restore(Arc::new(MemoryStore::new()));
        let mut req = request();
        BearerAuth::new(session).intercept(&mut req).unwrap();
        assert!(req.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_token_becomes_bearer_header() {
        let session = SessionHandle::restore(Arc::new(MemoryStore::new()));
        session.establish(Session {
            token: "abc.def".into(),
            ..Default::default()
        });

        let mut req = request();
        BearerAuth::new(session).intercept(&mut req).unwrap();
        assert_eq!(
            req.headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer abc.def"
        );
    }

    #[test]
    fn test_invalid_token_is_a_setup_error() {
        let session = SessionHandle::restore(Arc::new(MemoryStore::new()));
        session.update_token("bad\ntoken", None);

        let mut req = request();
        let err = BearerAuth::new(session).intercept(&mut req).unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
    }
}
