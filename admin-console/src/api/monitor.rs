use crate::error::Result;
use crate::http::ApiClient;
use crate::models::monitor::{HistoryQuery, MonitorHistory, MonitorMetrics};
use crate::models::Ack;

#[derive(Debug, Clone)]
pub struct MonitorApi {
    client: ApiClient,
}

impl MonitorApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_health_status(&self) -> Result<MonitorMetrics> {
        self.client.get("/monitor/health").await
    }

    pub async fn get_detailed_health_status(&self) -> Result<MonitorMetrics> {
        self.client.get("/monitor/health/detailed").await
    }

    pub async fn get_metrics(&self) -> Result<MonitorMetrics> {
        self.client.get("/monitor/metrics").await
    }

    pub async fn get_detailed_metrics(&self) -> Result<MonitorMetrics> {
        self.client.get("/monitor/metrics/detailed").await
    }

    pub async fn get_history_data(&self, query: &HistoryQuery) -> Result<MonitorHistory> {
        self.client
            .get_query("/monitor/metrics/history", query)
            .await
    }

    pub async fn reset_metrics(&self) -> Result<Ack> {
        self.client.post_empty("/monitor/metrics/reset").await
    }

    pub async fn get_streaming_stats(&self) -> Result<Ack> {
        self.client.get("/monitor/streaming").await
    }

    /// Served by the storage service, outside the `/monitor` prefix
    pub async fn get_storage_performance(&self) -> Result<Ack> {
        self.client.get("/storage/performance").await
    }
}
