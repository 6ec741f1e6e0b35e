use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use super::{LoadingSet, Sequencer, Snapshot, StateCell, DEFAULT_PAGE_SIZE, FIRST_PAGE};
use crate::api::MediaApi;
use crate::error::{ApiError, Result};
use crate::http::{progress_percent, ProgressFn};
use crate::models::media::{
    ChunkUploadInit, ChunkUploadSession, MediaFile, MediaFileQuery, MediaKind, StorageUsage,
    TranscodeOptions, TranscodeStatus, TranscodeTask, TranscodeTaskQuery, UploadFile,
    UploadOptions, UploadStatus, UploadTask,
};
use crate::models::{non_empty, Ack, Page, Pagination};
use crate::utils::file::chunk_count;

const UPLOAD_FAILED: &str = "Upload failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaResource {
    List,
    Upload,
    Transcode,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaFilters {
    pub file_type: String,
    pub status: String,
    pub keyword: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaState {
    pub media_files: Vec<MediaFile>,
    pub total_count: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub filters: MediaFilters,
    pub upload_tasks: Vec<UploadTask>,
    pub transcode_tasks: Vec<TranscodeTask>,
    pub current_media: Option<MediaFile>,
    pub storage_usage: StorageUsage,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            media_files: Vec::new(),
            total_count: 0,
            current_page: FIRST_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            filters: MediaFilters::default(),
            upload_tasks: Vec::new(),
            transcode_tasks: Vec::new(),
            current_media: None,
            storage_usage: StorageUsage::default(),
        }
    }
}

impl MediaState {
    fn task_mut(&mut self, task_id: &str) -> Option<&mut UploadTask> {
        self.upload_tasks.iter_mut().find(|t| t.id == task_id)
    }

    fn files_of(&self, kind: MediaKind) -> Vec<MediaFile> {
        self.media_files
            .iter()
            .filter(|f| f.file_type == kind)
            .cloned()
            .collect()
    }
}

/// `upload-<epoch millis>-<9 base36 chars>`
pub fn upload_task_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("upload-{}-{}", Utc::now().timestamp_millis(), suffix)
}

#[derive(Debug)]
pub struct MediaStore {
    api: MediaApi,
    state: Arc<StateCell<MediaState>>,
    loading: LoadingSet<MediaResource>,
    list_seq: Sequencer,
    transcode_seq: Sequencer,
}

impl MediaStore {
    pub fn new(api: MediaApi) -> Self {
        Self {
            api,
            state: Arc::new(StateCell::new(MediaState::default())),
            loading: LoadingSet::default(),
            list_seq: Sequencer::default(),
            transcode_seq: Sequencer::default(),
        }
    }

    pub fn snapshot(&self) -> Snapshot<MediaState> {
        self.state.snapshot()
    }

    pub fn is_loading(&self, resource: MediaResource) -> bool {
        self.loading.is_loading(resource)
    }

    /// Current page, page size and non-blank filters, then any set field of
    /// `overrides`
    pub fn list_query(&self, overrides: Option<&MediaFileQuery>) -> MediaFileQuery {
        let mut query = self.state.read(|s| MediaFileQuery {
            page: Some(s.current_page),
            size: Some(s.page_size),
            file_type: non_empty(&s.filters.file_type),
            status: non_empty(&s.filters.status),
            keyword: non_empty(&s.filters.keyword),
            start_date: non_empty(&s.filters.start_date),
            end_date: non_empty(&s.filters.end_date),
            sort_by: None,
            sort_order: None,
        });

        if let Some(o) = overrides {
            macro_rules! overlay {
                ($($field:ident),*) => {
                    $(if o.$field.is_some() { query.$field = o.$field.clone(); })*
                };
            }
            overlay!(page, size, file_type, status, keyword, start_date, end_date, sort_by, sort_order);
        }
        query
    }

    pub async fn fetch_media_files(
        &self,
        overrides: Option<&MediaFileQuery>,
    ) -> Result<Page<MediaFile>> {
        let _loading = self.loading.begin(MediaResource::List);
        let ticket = self.list_seq.ticket();
        let query = self.list_query(overrides);

        let page = self.api.get_media_files(&query).await?;

        if self.list_seq.is_latest(ticket) {
            self.state.update(|s| {
                s.media_files = page.items.clone();
                s.total_count = page.total;
            });
        } else {
            debug!(ticket, "discarding superseded media list response");
        }
        Ok(page)
    }

    pub async fn search_media(&self, keyword: &str) -> Result<Page<MediaFile>> {
        self.state.update(|s| s.filters.keyword = keyword.to_string());
        self.fetch_media_files(None).await
    }

    pub async fn filter_by_type(&self, file_type: &str) -> Result<Page<MediaFile>> {
        self.state.update(|s| s.filters.file_type = file_type.to_string());
        self.fetch_media_files(None).await
    }

    pub async fn filter_by_status(&self, status: &str) -> Result<Page<MediaFile>> {
        self.state.update(|s| s.filters.status = status.to_string());
        self.fetch_media_files(None).await
    }

    pub fn set_filters(&self, filters: MediaFilters) {
        self.state.update(|s| s.filters = filters);
    }

    pub fn set_page(&self, page: u32) {
        self.state.update(|s| s.current_page = page.max(FIRST_PAGE));
    }

    pub fn set_page_size(&self, size: u32) {
        self.state.update(|s| s.page_size = size.max(1));
    }

    /// Whole-file upload tracked by an upload task
    pub async fn upload_file(&self, file: &UploadFile, options: &UploadOptions) -> Result<MediaFile> {
        let _loading = self.loading.begin(MediaResource::Upload);
        let task_id = self.create_upload_task(&file.file_name, file.size());

        let state = Arc::clone(&self.state);
        let progress_task = task_id.clone();
        let on_progress: ProgressFn = Arc::new(move |loaded, total| {
            let percent = progress_percent(loaded, total);
            state.update(|s| {
                if let Some(task) = s.task_mut(&progress_task) {
                    task.progress = percent;
                }
            });
        });

        match self.api.upload_file(file, options, Some(on_progress)).await {
            Ok(media) => {
                self.complete_upload_task(&task_id, media.clone());
                Ok(media)
            }
            Err(e) => {
                self.fail_upload_task(&task_id, &e.message());
                Err(e)
            }
        }
    }

    pub async fn upload_chunk(
        &self,
        chunk: &UploadFile,
        chunk_index: u32,
        total_chunks: u32,
        file_uuid: &str,
    ) -> Result<ChunkUploadSession> {
        self.api
            .upload_chunk(chunk, file_uuid, chunk_index, total_chunks)
            .await
    }

    /// Merged file is prepended to the list
    pub async fn merge_chunks(&self, file_uuid: &str) -> Result<MediaFile> {
        let media = self.api.merge_chunks(file_uuid).await?;
        self.state.update(|s| {
            s.media_files.insert(0, media.clone());
            s.total_count += 1;
        });
        Ok(media)
    }

    /// init, then every chunk in order, then merge. No retry or resume.
    pub async fn upload_chunked(&self, file: &UploadFile, chunk_size: u64) -> Result<MediaFile> {
        let _loading = self.loading.begin(MediaResource::Upload);
        let task_id = self.create_upload_task(&file.file_name, file.size());

        match self.run_chunked(&task_id, file, chunk_size).await {
            Ok(media) => {
                self.complete_upload_task(&task_id, media.clone());
                Ok(media)
            }
            Err(e) => {
                self.fail_upload_task(&task_id, &e.message());
                Err(e)
            }
        }
    }

    async fn run_chunked(
        &self,
        task_id: &str,
        file: &UploadFile,
        chunk_size: u64,
    ) -> Result<MediaFile> {
        if chunk_size == 0 {
            return Err(ApiError::Request("chunk size must be positive".into()));
        }
        let total_chunks = chunk_count(file.size(), chunk_size);

        let session = self
            .api
            .init_chunk_upload(&ChunkUploadInit {
                file_name: file.file_name.clone(),
                file_size: file.size(),
                chunk_size,
                total_chunks,
            })
            .await?;
        if session.file_uuid.is_empty() {
            return Err(ApiError::Decode("chunk upload init returned no fileUuid".into()));
        }
        info!(file_uuid = %session.file_uuid, total_chunks, "chunked upload started");

        for index in 0..total_chunks {
            let chunk = file.chunk(index, chunk_size);
            self.api
                .upload_chunk(&chunk, &session.file_uuid, index, total_chunks)
                .await?;
            self.update_upload_progress(task_id, u64::from(index) + 1, u64::from(total_chunks));
        }

        self.api.merge_chunks(&session.file_uuid).await
    }

    pub async fn create_transcode_task(
        &self,
        media_id: &str,
        options: &TranscodeOptions,
    ) -> Result<TranscodeTask> {
        let _loading = self.loading.begin(MediaResource::Transcode);
        let mut task = self.api.create_transcode_task(media_id, options).await?;
        if task.media_id.is_empty() {
            task.media_id = media_id.to_string();
        }
        if task.target_format.is_empty() {
            task.target_format = options.target_format.clone();
        }
        if task.create_time.is_empty() {
            task.create_time = Utc::now().to_rfc3339();
        }

        self.state.update(|s| s.transcode_tasks.push(task.clone()));
        Ok(task)
    }

    pub async fn fetch_transcode_tasks(
        &self,
        query: &TranscodeTaskQuery,
    ) -> Result<Page<TranscodeTask>> {
        let _loading = self.loading.begin(MediaResource::Transcode);
        let ticket = self.transcode_seq.ticket();
        let page = self.api.get_transcode_tasks(query).await?;

        if self.transcode_seq.is_latest(ticket) {
            self.state.update(|s| s.transcode_tasks = page.items.clone());
        } else {
            debug!(ticket, "discarding superseded transcode task response");
        }
        Ok(page)
    }

    /// Removes exactly the matching file; other entries keep their order
    pub async fn delete_media_file(&self, media_id: &str) -> Result<Ack> {
        let ack = self.api.delete_media_file(media_id).await?;
        self.state.update(|s| {
            s.media_files.retain(|f| f.id != media_id);
            s.total_count = s.total_count.saturating_sub(1);
            if s.current_media.as_ref().is_some_and(|m| m.id == media_id) {
                s.current_media = None;
            }
        });
        Ok(ack)
    }

    pub async fn fetch_storage_usage(&self) -> Result<StorageUsage> {
        let usage = self.api.get_storage_usage().await?;
        self.state.update(|s| s.storage_usage = usage.clone());
        Ok(usage)
    }

    pub fn create_upload_task(&self, file_name: &str, file_size: u64) -> String {
        let id = upload_task_id();
        let task = UploadTask {
            id: id.clone(),
            file_name: file_name.to_string(),
            file_size,
            progress: 0,
            status: UploadStatus::Uploading,
            start_time: Utc::now(),
            end_time: None,
            error: None,
            result: None,
        };
        self.state.update(|s| s.upload_tasks.push(task));
        id
    }

    pub fn update_upload_progress(&self, task_id: &str, loaded: u64, total: u64) {
        let percent = progress_percent(loaded, total);
        self.state.update(|s| {
            if let Some(task) = s.task_mut(task_id) {
                task.progress = percent;
            }
        });
    }

    /// Marks the task done and prepends the file; unknown ids are ignored
    pub fn complete_upload_task(&self, task_id: &str, media: MediaFile) {
        self.state.update(|s| {
            let Some(task) = s.task_mut(task_id) else {
                return;
            };
            task.status = UploadStatus::Completed;
            task.progress = 100;
            task.end_time = Some(Utc::now());
            task.result = Some(media.clone());

            s.media_files.insert(0, media);
            s.total_count += 1;
        });
    }

    pub fn fail_upload_task(&self, task_id: &str, error: &str) {
        let message = if error.trim().is_empty() {
            UPLOAD_FAILED
        } else {
            error
        };
        warn!(task_id, error = message, "upload failed");
        self.state.update(|s| {
            if let Some(task) = s.task_mut(task_id) {
                task.status = UploadStatus::Failed;
                task.end_time = Some(Utc::now());
                task.error = Some(message.to_string());
            }
        });
    }

    pub fn clear_completed_tasks(&self) {
        self.state
            .update(|s| s.upload_tasks.retain(|t| t.status != UploadStatus::Completed));
    }

    pub fn set_current_media(&self, media: Option<MediaFile>) {
        self.state.update(|s| s.current_media = media);
    }

    pub fn reset_filters(&self) {
        self.state.update(|s| s.filters = MediaFilters::default());
    }

    pub fn uploading_tasks(&self) -> Vec<UploadTask> {
        self.tasks_with(UploadStatus::Uploading)
    }

    pub fn failed_tasks(&self) -> Vec<UploadTask> {
        self.tasks_with(UploadStatus::Failed)
    }

    pub fn transcoding_tasks(&self) -> Vec<TranscodeTask> {
        self.state.read(|s| {
            s.transcode_tasks
                .iter()
                .filter(|t| t.status == TranscodeStatus::Processing)
                .cloned()
                .collect()
        })
    }

    pub fn video_files(&self) -> Vec<MediaFile> {
        self.state.read(|s| s.files_of(MediaKind::Video))
    }

    pub fn audio_files(&self) -> Vec<MediaFile> {
        self.state.read(|s| s.files_of(MediaKind::Audio))
    }

    pub fn image_files(&self) -> Vec<MediaFile> {
        self.state.read(|s| s.files_of(MediaKind::Image))
    }

    pub fn pagination_info(&self) -> Pagination {
        self.state
            .read(|s| Pagination::new(s.current_page, s.page_size, s.total_count))
    }

    fn tasks_with(&self, status: UploadStatus) -> Vec<UploadTask> {
        self.state.read(|s| {
            s.upload_tasks
                .iter()
                .filter(|t| t.status == status)
                .cloned()
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_task_id_shape() {
        let id = upload_task_id();
        let parts: Vec<&str> = id.splitn(3, '-').collect();
        assert_eq!(parts[0], "upload");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
