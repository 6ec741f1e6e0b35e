//! Ordered request pipeline applied to every outbound call before it is sent

pub mod auth;
pub mod cache_bust;

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::Method;

use crate::error::Result;
use crate::http::RequestId;

pub use auth::BearerAuth;
pub use cache_bust::CacheBuster;

/// A request as seen by interceptors, before it becomes a `reqwest::Request`
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub id: RequestId,
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl OutgoingRequest {
    pub fn new(id: RequestId, method: Method, path: impl Into<String>) -> Self {
        Self {
            id,
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Replaces every existing value of `key`
    pub fn set_query(&mut self, key: &str, value: impl Into<String>) {
        self.query.retain(|(k, _)| k != key);
        self.query.push((key.to_string(), value.into()));
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub trait RequestInterceptor: Send + Sync {
    fn name(&self) -> &'static str;

    /// An error aborts the request as a request-setup failure
    fn intercept(&self, request: &mut OutgoingRequest) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct RequestPipeline {
    stages: Vec<Arc<dyn RequestInterceptor>>,
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|s| s.name()))
            .finish()
    }
}

impl RequestPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stage: impl RequestInterceptor + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn push(&mut self, stage: Arc<dyn RequestInterceptor>) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs stages in insertion order, stopping at the first failure
    pub fn apply(&self, request: &mut OutgoingRequest) -> Result<()> {
        for stage in &self.stages {
            stage.intercept(request)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::http::InFlightTracker;

    struct Tag(&'static str);

    impl RequestInterceptor for Tag {
        fn name(&self) -> &'static str {
            self.0
        }

        fn intercept(&self, request: &mut OutgoingRequest) -> Result<()> {
            let seen = request.query_value("order").unwrap_or("").to_string();
            request.set_query("order", format!("{}{}", seen, self.0));
            Ok(())
        }
    }

    struct Reject;

    impl RequestInterceptor for Reject {
        fn name(&self) -> &'static str {
            "reject"
        }

        fn intercept(&self, _request: &mut OutgoingRequest) -> Result<()> {
            Err(ApiError::Request("rejected".into()))
        }
    }

    fn request() -> OutgoingRequest {
        let tracker = InFlightTracker::new();
        let guard = tracker.begin();
        OutgoingRequest::new(guard.id(), Method::GET, "/live/v1/streams")
    }

    #[test]
    fn test_stages_run_in_order() {
        let pipeline = RequestPipeline::new().with(Tag("a")).with(Tag("b"));
        let mut req = request();
        pipeline.apply(&mut req).unwrap();
        assert_eq!(req.query_value("order"), Some("ab"));
        assert_eq!(pipeline.stage_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_failing_stage_stops_pipeline() {
        let pipeline = RequestPipeline::new().with(Reject).with(Tag("late"));
        let mut req = request();
        assert!(pipeline.apply(&mut req).is_err());
        assert!(req.query_value("order").is_none());
    }
}
