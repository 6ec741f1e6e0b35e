use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceStatus {
    Healthy,
    Warning,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceStatusReport {
    pub overall: ServiceStatus,
    pub storage: ServiceStatus,
    pub media: ServiceStatus,
    pub transcode: ServiceStatus,
    pub last_check_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemMetrics {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub memory_total: u64,
    pub memory_used: u64,
    pub disk_usage: f64,
    pub disk_total: u64,
    pub disk_used: u64,
    pub thread_count: u64,
    pub system_load: f64,
    pub uptime: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessMetrics {
    pub upload_count: u64,
    pub download_count: u64,
    pub transcode_count: u64,
    pub stream_count: u64,
    pub active_users: u64,
    pub total_files: u64,
    pub total_size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceMetrics {
    pub avg_response_time: f64,
    pub max_response_time: f64,
    pub error_rate: f64,
    pub throughput: f64,
    pub concurrent_users: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageMetrics {
    pub storage_usage: f64,
    pub storage_total: u64,
    pub storage_used: u64,
    pub storage_free: u64,
    pub storage_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkMetrics {
    pub network_in: u64,
    pub network_out: u64,
    pub requests_per_second: f64,
    pub active_connections: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorMetrics {
    pub service_status: ServiceStatusReport,
    pub system_metrics: SystemMetrics,
    pub business_metrics: BusinessMetrics,
    pub performance_metrics: PerformanceMetrics,
    pub storage_metrics: StorageMetrics,
    pub network_metrics: NetworkMetrics,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsSample {
    pub timestamp: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub error_rate: f64,
    pub throughput: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorHistory {
    pub timestamp: String,
    pub metrics: Vec<MetricsSample>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_status_is_uppercase_on_wire() {
        let report: ServiceStatusReport = serde_json::from_value(serde_json::json!({
            "overall": "HEALTHY",
            "storage": "WARNING",
            "media": "DEGRADED"
        }))
        .unwrap();
        assert_eq!(report.overall, ServiceStatus::Healthy);
        assert_eq!(report.storage, ServiceStatus::Warning);
        assert_eq!(report.media, ServiceStatus::Unknown);
        assert_eq!(report.transcode, ServiceStatus::Unknown);
    }
}
