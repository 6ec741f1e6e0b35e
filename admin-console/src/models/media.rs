use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::SortOrder;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
    #[default]
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
            MediaKind::Document => "document",
        }
    }
}

/// Server-reported processing status; unknown strings map to `Unknown`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Uploading,
    Processing,
    Completed,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaFile {
    pub id: String,
    pub name: String,
    pub original_name: String,
    pub file_type: MediaKind,
    pub mime_type: String,
    pub file_size: u64,
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub thumbnail_url: Option<String>,
    pub preview_url: Option<String>,
    pub download_url: Option<String>,
    pub status: MediaStatus,
    pub upload_time: String,
    pub upload_by: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Pending,
    Uploading,
    Completed,
    Failed,
}

/// Local bookkeeping for one upload; never sent to the server
#[derive(Debug, Clone, PartialEq)]
pub struct UploadTask {
    pub id: String,
    pub file_name: String,
    pub file_size: u64,
    /// 0..=100
    pub progress: u8,
    pub status: UploadStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub result: Option<MediaFile>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TranscodeStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscodeTask {
    pub id: String,
    pub media_id: String,
    pub target_format: String,
    pub quality: String,
    pub status: TranscodeStatus,
    pub progress: u8,
    pub create_time: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub error: Option<String>,
    pub output_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFileQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Sent as a JSON array in the `tags` form field
    pub tags: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkUploadInit {
    pub file_name: String,
    pub file_size: u64,
    pub chunk_size: u64,
    pub total_chunks: u32,
}

/// Server view of a chunked upload, returned by init and per-chunk calls
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChunkUploadSession {
    pub upload_id: Option<String>,
    pub file_uuid: String,
    pub chunk_size: Option<u64>,
    pub total_chunks: Option<u32>,
    pub uploaded_chunks: u32,
    pub progress: u8,
    pub status: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Watermark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeOptions {
    pub target_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<Watermark>,
}

impl TranscodeOptions {
    pub fn new(target_format: impl Into<String>) -> Self {
        Self {
            target_format: target_format.into(),
            quality: None,
            resolution: None,
            bitrate: None,
            watermark: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeTaskQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// 10 GiB, shown until the first usage fetch lands
pub const DEFAULT_STORAGE_TOTAL: u64 = 10 * 1024 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageUsage {
    pub used: u64,
    pub total: u64,
    pub percentage: f64,
    pub files_count: u64,
    pub last_cleanup_time: Option<String>,
}

impl Default for StorageUsage {
    fn default() -> Self {
        Self {
            used: 0,
            total: DEFAULT_STORAGE_TOTAL,
            percentage: 0.0,
            files_count: 0,
            last_cleanup_time: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaStats {
    pub total_files: u64,
    pub total_size: u64,
    pub today_uploads: u64,
    pub today_size: u64,
    pub file_type_distribution: HashMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewUrl {
    pub preview_url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct IdsBody<'a> {
    pub ids: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct TagsBody<'a> {
    pub ids: &'a [String],
    pub tags: &'a [String],
}

/// In-memory file handed to multipart uploads
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub content: bytes::Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<bytes::Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            content: content.into(),
        }
    }

    pub fn with_mime(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub async fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Request(format!("cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, content))
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Zero-copy view of one chunk; the last chunk may be shorter
    pub fn chunk(&self, index: u32, chunk_size: u64) -> UploadFile {
        let len = self.content.len();
        let start = (u64::from(index) * chunk_size).min(len as u64) as usize;
        let end = (start as u64 + chunk_size).min(len as u64) as usize;
        UploadFile {
            file_name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
            content: self.content.slice(start..end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_file_tolerates_unknown_status() {
        let file: MediaFile = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "fileType": "video",
            "fileSize": 2048,
            "status": "archived"
        }))
        .unwrap();
        assert_eq!(file.file_type, MediaKind::Video);
        assert_eq!(file.status, MediaStatus::Unknown);
        assert!(file.tags.is_empty());
    }

    #[test]
    fn test_chunk_slices_last_piece_short() {
        let file = UploadFile::new("clip.mp4", vec![7u8; 10]);
        assert_eq!(file.chunk(0, 4).size(), 4);
        assert_eq!(file.chunk(2, 4).size(), 2);
        assert_eq!(file.chunk(5, 4).size(), 0);
    }

    #[test]
    fn test_media_query_serializes_only_set_filters() {
        let query = MediaFileQuery {
            page: Some(1),
            keyword: Some("demo".into()),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(query).unwrap(),
            serde_json::json!({"page": 1, "keyword": "demo", "sortOrder": "desc"})
        );
    }
}
