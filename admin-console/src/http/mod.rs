//! Shared HTTP client for every backend service.
//!
//! One request goes through: in-flight registration, the request pipeline
//! (bearer token, cache buster), the send, then either envelope unwrapping or
//! failure classification. Nothing is retried.

pub mod classify;
pub mod in_flight;
pub mod upload;

use std::sync::Arc;

use bytes::Bytes;
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::middleware::{BearerAuth, CacheBuster, OutgoingRequest, RequestInterceptor, RequestPipeline};
use crate::models::Envelope;
use crate::notice::{Notifier, TracingNotifier};
use crate::session::SessionHandle;
use crate::store::ErrorLog;

pub use classify::{classify_business, classify_network, Classification, TransportFailure};
pub use in_flight::{InFlightGuard, InFlightTracker, RequestId};
pub use upload::{progress_percent, ProgressFn};

enum Body {
    Empty,
    Json(serde_json::Value),
    Multipart(Form),
}

/// What a successful call hands back before decoding
enum Expect {
    Envelope,
    Binary,
}

struct ClientInner {
    http: Client,
    base_url: String,
    pipeline: RequestPipeline,
    session: SessionHandle,
    notifier: Arc<dyn Notifier>,
    in_flight: InFlightTracker,
    error_log: ErrorLog,
}

/// Cheap to clone; all clones share one connection pool and state
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("pipeline", &self.inner.pipeline)
            .finish()
    }
}

pub struct ApiClientBuilder {
    config: ApiConfig,
    session: SessionHandle,
    notifier: Arc<dyn Notifier>,
    in_flight: InFlightTracker,
    error_log: ErrorLog,
    extra_stages: Vec<Arc<dyn RequestInterceptor>>,
    cache_buster: CacheBuster,
}

impl ApiClientBuilder {
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn in_flight(mut self, tracker: InFlightTracker) -> Self {
        self.in_flight = tracker;
        self
    }

    pub fn error_log(mut self, log: ErrorLog) -> Self {
        self.error_log = log;
        self
    }

    pub fn cache_buster(mut self, cache_buster: CacheBuster) -> Self {
        self.cache_buster = cache_buster;
        self
    }

    /// Appended after the built-in auth and cache-busting stages
    pub fn interceptor(mut self, stage: Arc<dyn RequestInterceptor>) -> Self {
        self.extra_stages.push(stage);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let http = Client::builder()
            .timeout(self.config.timeout())
            .build()
            .map_err(|e| ApiError::Request(format!("failed to build HTTP client: {}", e)))?;

        let mut pipeline = RequestPipeline::new()
            .with(BearerAuth::new(self.session.clone()))
            .with(self.cache_buster);
        for stage in self.extra_stages {
            pipeline.push(stage);
        }

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: self.config.base_url.trim_end_matches('/').to_string(),
                pipeline,
                session: self.session,
                notifier: self.notifier,
                in_flight: self.in_flight,
                error_log: self.error_log,
            }),
        })
    }
}

impl ApiClient {
    pub fn builder(config: &ApiConfig, session: SessionHandle) -> ApiClientBuilder {
        ApiClientBuilder {
            config: config.clone(),
            session,
            notifier: Arc::new(TracingNotifier),
            in_flight: InFlightTracker::new(),
            error_log: ErrorLog::new(),
            extra_stages: Vec::new(),
            cache_buster: CacheBuster::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.inner.session
    }

    pub fn in_flight(&self) -> &InFlightTracker {
        &self.inner.in_flight
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.inner.error_log
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call(Method::GET, path, Vec::new(), Body::Empty).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let pairs = self.encode_query(query)?;
        self.call(Method::GET, path, pairs, Body::Empty).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.encode_body(body)?;
        self.call(Method::POST, path, Vec::new(), body).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call(Method::POST, path, Vec::new(), Body::Empty).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.encode_body(body)?;
        self.call(Method::PUT, path, Vec::new(), body).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.encode_body(body)?;
        self.call(Method::PATCH, path, Vec::new(), body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call(Method::DELETE, path, Vec::new(), Body::Empty).await
    }

    pub async fn delete_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let pairs = self.encode_query(query)?;
        self.call(Method::DELETE, path, pairs, Body::Empty).await
    }

    /// Multipart POST; attach progress reporting to the form's file part
    pub async fn upload<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        self.call(Method::POST, path, Vec::new(), Body::Multipart(form))
            .await
    }

    /// Binary GET. The body is returned as-is, without envelope interpretation.
    pub async fn download<Q>(&self, path: &str, query: &Q) -> Result<Bytes>
    where
        Q: Serialize + ?Sized,
    {
        let pairs = self.encode_query(query)?;
        let guard = self.inner.in_flight.begin();
        let response = self
            .send(guard.id(), Method::GET, path, pairs, Body::Empty, Expect::Binary)
            .await?;
        response
            .bytes()
            .await
            .map_err(|e| self.transport_failed(TransportFailure::NoResponse { reason: e.to_string() }))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Body,
    ) -> Result<T> {
        let guard = self.inner.in_flight.begin();
        let response = self
            .send(guard.id(), method, path, query, body, Expect::Envelope)
            .await?;
        let raw = response
            .bytes()
            .await
            .map_err(|e| self.transport_failed(TransportFailure::NoResponse { reason: e.to_string() }))?;
        drop(guard);

        self.unwrap_envelope(path, &raw)
    }

    async fn send(
        &self,
        id: RequestId,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Body,
        expect: Expect,
    ) -> Result<Response> {
        let mut outgoing = OutgoingRequest::new(id, method, path).with_query(query);
        if let Err(e) = self.inner.pipeline.apply(&mut outgoing) {
            return Err(self.transport_failed(TransportFailure::Other { reason: e.message() }));
        }

        debug!(
            request_id = %outgoing.id,
            method = %outgoing.method,
            path = %outgoing.path,
            binary = matches!(expect, Expect::Binary),
            "sending request"
        );

        let mut builder = self
            .inner
            .http
            .request(outgoing.method, self.url(&outgoing.path))
            .headers(outgoing.headers)
            .query(&outgoing.query);
        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(form) => builder.multipart(form),
        };

        match builder.send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status();
                let reason = status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string();
                let body_message = response
                    .json::<Envelope>()
                    .await
                    .ok()
                    .and_then(|envelope| envelope.message);
                Err(self.transport_failed(TransportFailure::Status {
                    status: status.as_u16(),
                    body_message,
                    reason,
                }))
            }
            Err(e) => {
                let failure = if e.is_builder() {
                    TransportFailure::Other { reason: e.to_string() }
                } else {
                    TransportFailure::NoResponse { reason: e.to_string() }
                };
                Err(self.transport_failed(failure))
            }
        }
    }

    fn unwrap_envelope<T: DeserializeOwned>(&self, path: &str, raw: &[u8]) -> Result<T> {
        // an unreadable body has no code, which classifies like code 0
        let envelope: Envelope = match serde_json::from_slice(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(path, error = %e, "response body is not an envelope");
                return Err(self.business_failed(0, None));
            }
        };

        if !envelope.is_success() {
            return Err(self.business_failed(envelope.code, envelope.message.as_deref()));
        }

        serde_json::from_value(envelope.data).map_err(|e| {
            warn!(path, error = %e, "envelope data does not match the expected type");
            ApiError::Decode(e.to_string())
        })
    }

    fn business_failed(&self, code: i64, message: Option<&str>) -> ApiError {
        let classification = classify_business(code, message);
        warn!(code, message = ?message, "business error");

        if classification.clear_session {
            self.inner.session.clear();
        }
        self.inner.notifier.notify(classification.notice);

        ApiError::Business {
            code,
            message: classify::failure_message(message),
        }
    }

    fn transport_failed(&self, failure: TransportFailure) -> ApiError {
        let classification = classify_network(&failure);
        warn!(failure = ?failure, "request failed");

        if let Some(line) = &classification.log_line {
            self.inner.error_log.push(line);
        }
        self.inner.notifier.notify(classification.notice.clone());

        failure.into_error(&classification)
    }

    /// Reports a request that could not be assembled, e.g. a bad multipart part
    pub(crate) fn request_setup_failed(&self, error: ApiError) -> ApiError {
        let reason = match error {
            ApiError::Request(reason) => reason,
            other => other.to_string(),
        };
        self.transport_failed(TransportFailure::Other { reason })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.inner.base_url, path)
        } else {
            format!("{}/{}", self.inner.base_url, path)
        }
    }

    fn encode_query<Q: Serialize + ?Sized>(&self, query: &Q) -> Result<Vec<(String, String)>> {
        query_pairs(query)
            .map_err(|e| self.transport_failed(TransportFailure::Other { reason: e.message() }))
    }

    fn encode_body<B: Serialize + ?Sized>(&self, body: &B) -> Result<Body> {
        serde_json::to_value(body).map(Body::Json).map_err(|e| {
            self.transport_failed(TransportFailure::Other {
                reason: format!("cannot encode request body: {}", e),
            })
        })
    }
}

/// Flattens a serializable struct into query pairs.
///
/// `None` fields vanish, arrays repeat their key and nested objects are sent
/// as JSON text.
pub fn query_pairs<Q: Serialize + ?Sized>(query: &Q) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(query)
        .map_err(|e| ApiError::Request(format!("cannot encode query: {}", e)))?;

    let map = match value {
        serde_json::Value::Null => return Ok(Vec::new()),
        serde_json::Value::Object(map) => map,
        other => {
            return Err(ApiError::Request(format!(
                "query must be an object, got {}",
                other
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar(item)));
                }
            }
            other => pairs.push((key, scalar(other))),
        }
    }
    Ok(pairs)
}

fn scalar(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Filters {
        page: u32,
        keyword: Option<String>,
        file_type: Option<String>,
        ids: Vec<u32>,
        live: bool,
    }

    #[test]
    fn test_query_pairs_skip_missing_filters() {
        let mut pairs = query_pairs(&Filters {
            page: 2,
            keyword: None,
            file_type: Some("video".into()),
            ids: vec![1, 2],
            live: true,
        })
        .unwrap();
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("fileType".to_string(), "video".to_string()),
                ("ids".to_string(), "1".to_string()),
                ("ids".to_string(), "2".to_string()),
                ("live".to_string(), "true".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_unit_is_empty() {
        assert!(query_pairs(&()).unwrap().is_empty());
        assert!(query_pairs(&5u8).is_err());
    }
}
