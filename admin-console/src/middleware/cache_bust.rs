use super::{OutgoingRequest, RequestInterceptor};
use crate::error::Result;

pub const CACHE_BUST_PARAM: &str = "_t";

/// Stamps `_t=<epoch millis>` on every request's query string
#[derive(Debug, Clone, Copy)]
pub struct CacheBuster {
    clock: fn() -> i64,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl Default for CacheBuster {
    fn default() -> Self {
        Self { clock: now_millis }
    }
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: fn() -> i64) -> Self {
        Self { clock }
    }
}

impl RequestInterceptor for CacheBuster {
    fn name(&self) -> &'static str {
        "cache-buster"
    }

    fn intercept(&self, request: &mut OutgoingRequest) -> Result<()> {
        request.set_query(CACHE_BUST_PARAM, (self.clock)().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::*;
    use crate::http::InFlightTracker;

    #[test]
    fn test_stamps_and_replaces_timestamp() {
        let tracker = InFlightTracker::new();
        let guard = tracker.begin();
        let mut req = OutgoingRequest::new(guard.id(), Method::GET, "/media/v1/files")
            .with_query(vec![
                ("page".to_string(), "1".to_string()),
                ("_t".to_string(), "1".to_string()),
            ]);

        CacheBuster::with_clock(|| 1_700_000_000_123)
            .intercept(&mut req)
            .unwrap();

        assert_eq!(req.query_value("page"), Some("1"));
        assert_eq!(req.query_value(CACHE_BUST_PARAM), Some("1700000000123"));
        assert_eq!(req.query.iter().filter(|(k, _)| k == "_t").count(), 1);
    }

    #[test]
    fn test_default_clock_is_current_time() {
        let tracker = InFlightTracker::new();
        let guard = tracker.begin();
        let mut req = OutgoingRequest::new(guard.id(), Method::GET, "/monitor/health");
        let before = chrono::Utc::now().timestamp_millis();

        CacheBuster::new().intercept(&mut req).unwrap();

        let stamped: i64 = req.query_value(CACHE_BUST_PARAM).unwrap().parse().unwrap();
        assert!(stamped >= before);
    }
}
