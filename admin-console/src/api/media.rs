use bytes::Bytes;
use reqwest::multipart::Form;

use crate::error::{ApiError, Result};
use crate::http::upload::file_part;
use crate::http::{ApiClient, ProgressFn};
use crate::models::media::{
    ChunkUploadInit, ChunkUploadSession, IdsBody, MediaFile, MediaFileQuery, MediaFileUpdate,
    MediaStats, PreviewUrl, StorageUsage, TagsBody, TranscodeOptions, TranscodeTask,
    TranscodeTaskQuery, UploadFile, UploadOptions,
};
use crate::models::{Ack, Page};

const BASE: &str = "/media/v1";

#[derive(Debug, Clone)]
pub struct MediaApi {
    client: ApiClient,
}

impl MediaApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_media_files(&self, query: &MediaFileQuery) -> Result<Page<MediaFile>> {
        self.client
            .get_query(&format!("{}/files", BASE), query)
            .await
    }

    /// Whole-file upload; `tags` travel as a JSON array in their own field
    pub async fn upload_file(
        &self,
        file: &UploadFile,
        options: &UploadOptions,
        on_progress: Option<ProgressFn>,
    ) -> Result<MediaFile> {
        let part = file_part(file, on_progress).map_err(|e| self.client.request_setup_failed(e))?;
        let mut form = Form::new().part("file", part);
        if !options.tags.is_empty() {
            let tags = serde_json::to_string(&options.tags).map_err(|e| {
                self.client
                    .request_setup_failed(ApiError::Request(format!("cannot encode tags: {}", e)))
            })?;
            form = form.text("tags", tags);
        }
        if let Some(description) = &options.description {
            form = form.text("description", description.clone());
        }

        self.client.upload(&format!("{}/upload", BASE), form).await
    }

    pub async fn init_chunk_upload(&self, init: &ChunkUploadInit) -> Result<ChunkUploadSession> {
        self.client
            .post(&format!("{}/upload/init", BASE), init)
            .await
    }

    pub async fn upload_chunk(
        &self,
        chunk: &UploadFile,
        file_uuid: &str,
        chunk_index: u32,
        total_chunks: u32,
    ) -> Result<ChunkUploadSession> {
        let part = file_part(chunk, None).map_err(|e| self.client.request_setup_failed(e))?;
        let form = Form::new()
            .part("file", part)
            .text("fileUuid", file_uuid.to_string())
            .text("chunkIndex", chunk_index.to_string())
            .text("totalChunks", total_chunks.to_string());

        self.client
            .upload(&format!("{}/upload/chunk/{}", BASE, file_uuid), form)
            .await
    }

    pub async fn merge_chunks(&self, file_uuid: &str) -> Result<MediaFile> {
        self.client
            .post_empty(&format!("{}/upload/merge/{}", BASE, file_uuid))
            .await
    }

    pub async fn get_media_file(&self, media_id: &str) -> Result<MediaFile> {
        self.client
            .get(&format!("{}/files/{}", BASE, media_id))
            .await
    }

    pub async fn delete_media_file(&self, media_id: &str) -> Result<Ack> {
        self.client
            .delete(&format!("{}/files/{}", BASE, media_id))
            .await
    }

    pub async fn batch_delete_media_files(&self, ids: &[String]) -> Result<Ack> {
        self.client
            .post(&format!("{}/files/batch-delete", BASE), &IdsBody { ids })
            .await
    }

    pub async fn update_media_file(
        &self,
        media_id: &str,
        update: &MediaFileUpdate,
    ) -> Result<MediaFile> {
        self.client
            .put(&format!("{}/files/{}", BASE, media_id), update)
            .await
    }

    pub async fn download_media_file(&self, media_id: &str) -> Result<Bytes> {
        self.client
            .download(&format!("{}/files/{}/download", BASE, media_id), &())
            .await
    }

    pub async fn get_preview_url(&self, media_id: &str) -> Result<PreviewUrl> {
        self.client
            .get(&format!("{}/files/{}/preview", BASE, media_id))
            .await
    }

    pub async fn create_transcode_task(
        &self,
        media_id: &str,
        options: &TranscodeOptions,
    ) -> Result<TranscodeTask> {
        self.client
            .post(&format!("{}/transcode/{}", BASE, media_id), options)
            .await
    }

    pub async fn get_transcode_tasks(
        &self,
        query: &TranscodeTaskQuery,
    ) -> Result<Page<TranscodeTask>> {
        self.client
            .get_query(&format!("{}/transcode/tasks", BASE), query)
            .await
    }

    pub async fn get_transcode_task(&self, task_id: &str) -> Result<TranscodeTask> {
        self.client
            .get(&format!("{}/transcode/tasks/{}", BASE, task_id))
            .await
    }

    pub async fn cancel_transcode_task(&self, task_id: &str) -> Result<Ack> {
        self.client
            .post_empty(&format!("{}/transcode/tasks/{}/cancel", BASE, task_id))
            .await
    }

    pub async fn get_storage_usage(&self) -> Result<StorageUsage> {
        self.client.get(&format!("{}/storage/usage", BASE)).await
    }

    pub async fn cleanup_expired_files(&self) -> Result<Ack> {
        self.client
            .post_empty(&format!("{}/storage/cleanup", BASE))
            .await
    }

    pub async fn get_media_stats(&self) -> Result<MediaStats> {
        self.client.get(&format!("{}/stats", BASE)).await
    }

    pub async fn batch_add_tags(&self, ids: &[String], tags: &[String]) -> Result<Ack> {
        self.client
            .post(&format!("{}/files/batch-tags", BASE), &TagsBody { ids, tags })
            .await
    }

    pub async fn batch_remove_tags(&self, ids: &[String], tags: &[String]) -> Result<Ack> {
        self.client
            .post(
                &format!("{}/files/batch-remove-tags", BASE),
                &TagsBody { ids, tags },
            )
            .await
    }
}
