use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::{LoadingSet, Sequencer, Snapshot, StateCell, DEFAULT_PAGE_SIZE, FIRST_PAGE};
use crate::api::LiveApi;
use crate::error::Result;
use crate::models::live::{
    CreateStreamRequest, LiveRecording, LiveRoom, LiveRoomQuery, LiveStats, LiveStream,
    LiveStreamQuery, RecordingOptions, RecordingQuery, RecordingStatus, RoomStatus, StreamStatus,
};
use crate::models::{non_empty, Ack, Page, Pagination};
use crate::rtc::{PeerConnection, PeerRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiveResource {
    Streams,
    Rooms,
    Recordings,
    Stats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveFilters {
    pub status: String,
    pub room_type: String,
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveState {
    pub live_streams: Vec<LiveStream>,
    pub total_streams: u64,
    pub live_rooms: Vec<LiveRoom>,
    pub total_rooms: u64,
    pub recordings: Vec<LiveRecording>,
    pub total_recordings: u64,
    pub current_stream: Option<LiveStream>,
    pub current_room: Option<LiveRoom>,
    pub live_stats: LiveStats,
    pub filters: LiveFilters,
    pub current_page: u32,
    pub page_size: u32,
}

impl Default for LiveState {
    fn default() -> Self {
        Self {
            live_streams: Vec::new(),
            total_streams: 0,
            live_rooms: Vec::new(),
            total_rooms: 0,
            recordings: Vec::new(),
            total_recordings: 0,
            current_stream: None,
            current_room: None,
            live_stats: LiveStats::default(),
            filters: LiveFilters::default(),
            current_page: FIRST_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl LiveState {
    fn stream_mut(&mut self, stream_id: &str) -> Option<&mut LiveStream> {
        self.live_streams.iter_mut().find(|s| s.id == stream_id)
    }
}

#[derive(Debug)]
pub struct LiveStore {
    api: LiveApi,
    state: StateCell<LiveState>,
    loading: LoadingSet<LiveResource>,
    streams_seq: Sequencer,
    rooms_seq: Sequencer,
    recordings_seq: Sequencer,
    stats_seq: Sequencer,
    peers: Arc<PeerRegistry>,
}

impl LiveStore {
    pub fn new(api: LiveApi, peers: Arc<PeerRegistry>) -> Self {
        Self {
            api,
            state: StateCell::new(LiveState::default()),
            loading: LoadingSet::default(),
            streams_seq: Sequencer::default(),
            rooms_seq: Sequencer::default(),
            recordings_seq: Sequencer::default(),
            stats_seq: Sequencer::default(),
            peers,
        }
    }

    pub fn snapshot(&self) -> Snapshot<LiveState> {
        self.state.snapshot()
    }

    pub fn is_loading(&self, resource: LiveResource) -> bool {
        self.loading.is_loading(resource)
    }

    pub async fn fetch_live_streams(
        &self,
        overrides: Option<&LiveStreamQuery>,
    ) -> Result<Page<LiveStream>> {
        let _loading = self.loading.begin(LiveResource::Streams);
        let ticket = self.streams_seq.ticket();

        let mut query = self.state.read(|s| LiveStreamQuery {
            page: Some(s.current_page),
            size: Some(s.page_size),
            status: non_empty(&s.filters.status),
            keyword: non_empty(&s.filters.keyword),
            sort_by: None,
            sort_order: None,
        });
        if let Some(o) = overrides {
            query.page = o.page.or(query.page);
            query.size = o.size.or(query.size);
            query.status = o.status.clone().or(query.status);
            query.keyword = o.keyword.clone().or(query.keyword);
            query.sort_by = o.sort_by.clone();
            query.sort_order = o.sort_order;
        }

        let page = self.api.get_live_streams(&query).await?;
        if self.streams_seq.is_latest(ticket) {
            self.state.update(|s| {
                s.live_streams = page.items.clone();
                s.total_streams = page.total;
            });
        } else {
            debug!(ticket, "discarding superseded stream list response");
        }
        Ok(page)
    }

    pub async fn fetch_live_rooms(
        &self,
        overrides: Option<&LiveRoomQuery>,
    ) -> Result<Page<LiveRoom>> {
        let _loading = self.loading.begin(LiveResource::Rooms);
        let ticket = self.rooms_seq.ticket();

        let mut query = self.state.read(|s| LiveRoomQuery {
            page: Some(s.current_page),
            size: Some(s.page_size),
            status: non_empty(&s.filters.status),
            room_type: non_empty(&s.filters.room_type),
            keyword: non_empty(&s.filters.keyword),
        });
        if let Some(o) = overrides {
            query.page = o.page.or(query.page);
            query.size = o.size.or(query.size);
            query.status = o.status.clone().or(query.status);
            query.room_type = o.room_type.clone().or(query.room_type);
            query.keyword = o.keyword.clone().or(query.keyword);
        }

        let page = self.api.get_live_rooms(&query).await?;
        if self.rooms_seq.is_latest(ticket) {
            self.state.update(|s| {
                s.live_rooms = page.items.clone();
                s.total_rooms = page.total;
            });
        } else {
            debug!(ticket, "discarding superseded room list response");
        }
        Ok(page)
    }

    /// Recordings are paged but not filtered by the shared filters
    pub async fn fetch_recordings(
        &self,
        overrides: Option<&RecordingQuery>,
    ) -> Result<Page<LiveRecording>> {
        let _loading = self.loading.begin(LiveResource::Recordings);
        let ticket = self.recordings_seq.ticket();

        let mut query = overrides.cloned().unwrap_or_default();
        self.state.read(|s| {
            query.page = query.page.or(Some(s.current_page));
            query.size = query.size.or(Some(s.page_size));
        });

        let page = self.api.get_recordings(&query).await?;
        if self.recordings_seq.is_latest(ticket) {
            self.state.update(|s| {
                s.recordings = page.items.clone();
                s.total_recordings = page.total;
            });
        } else {
            debug!(ticket, "discarding superseded recording list response");
        }
        Ok(page)
    }

    pub async fn fetch_live_stats(&self) -> Result<LiveStats> {
        let _loading = self.loading.begin(LiveResource::Stats);
        let ticket = self.stats_seq.ticket();

        let stats = self.api.get_live_stats().await?;
        if self.stats_seq.is_latest(ticket) {
            self.state.update(|s| s.live_stats = stats.clone());
        }
        Ok(stats)
    }

    /// The new stream is prepended; fields the server leaves empty are taken
    /// from the request and an unknown status becomes idle
    pub async fn create_live_stream(&self, request: &CreateStreamRequest) -> Result<LiveStream> {
        let mut stream = self.api.create_live_stream(request).await?;
        if stream.status == StreamStatus::Unknown {
            stream.status = StreamStatus::Idle;
        }
        if stream.name.is_empty() {
            stream.name = request.name.clone();
        }
        if stream.description.is_none() {
            stream.description = request.description.clone();
        }
        if stream.tags.is_empty() {
            stream.tags = request.tags.clone();
        }
        if stream.create_time.is_empty() {
            stream.create_time = Utc::now().to_rfc3339();
        }

        self.state.update(|s| {
            s.live_streams.insert(0, stream.clone());
            s.total_streams += 1;
        });
        info!(stream_id = %stream.id, "live stream created");
        Ok(stream)
    }

    pub async fn start_live_stream(&self, stream_id: &str) -> Result<Ack> {
        let ack = self.api.start_live_stream(stream_id).await?;
        self.state.update(|s| {
            if let Some(stream) = s.stream_mut(stream_id) {
                stream.status = StreamStatus::Live;
                stream.start_time = Some(Utc::now().to_rfc3339());
            }
        });
        Ok(ack)
    }

    pub async fn stop_live_stream(&self, stream_id: &str) -> Result<Ack> {
        let ack = self.api.stop_live_stream(stream_id).await?;
        self.state.update(|s| {
            if let Some(stream) = s.stream_mut(stream_id) {
                stream.status = StreamStatus::Stopped;
                stream.end_time = Some(Utc::now().to_rfc3339());
            }
        });
        Ok(ack)
    }

    pub async fn delete_live_stream(&self, stream_id: &str) -> Result<Ack> {
        let ack = self.api.delete_live_stream(stream_id).await?;
        self.state.update(|s| {
            s.live_streams.retain(|stream| stream.id != stream_id);
            s.total_streams = s.total_streams.saturating_sub(1);
            if s.current_stream.as_ref().is_some_and(|c| c.id == stream_id) {
                s.current_stream = None;
            }
        });
        self.peers.close(stream_id);
        Ok(ack)
    }

    pub async fn start_recording(
        &self,
        stream_id: &str,
        options: &RecordingOptions,
    ) -> Result<Ack> {
        let ack = self.api.start_recording(stream_id, options).await?;
        self.set_recording_status(stream_id, RecordingStatus::Recording);
        Ok(ack)
    }

    pub async fn stop_recording(&self, stream_id: &str) -> Result<Ack> {
        let ack = self.api.stop_recording(stream_id).await?;
        self.set_recording_status(stream_id, RecordingStatus::Stopped);
        Ok(ack)
    }

    pub fn create_webrtc_connection(&self, stream_id: &str) -> Arc<dyn PeerConnection> {
        self.peers.create(stream_id)
    }

    pub fn close_webrtc_connection(&self, stream_id: &str) {
        self.peers.close(stream_id);
    }

    pub fn webrtc_connection(&self, stream_id: &str) -> Option<Arc<dyn PeerConnection>> {
        self.peers.get(stream_id)
    }

    pub fn set_current_stream(&self, stream: Option<LiveStream>) {
        self.state.update(|s| s.current_stream = stream);
    }

    pub fn set_current_room(&self, room: Option<LiveRoom>) {
        self.state.update(|s| s.current_room = room);
    }

    pub fn set_filters(&self, filters: LiveFilters) {
        self.state.update(|s| s.filters = filters);
    }

    pub fn set_page(&self, page: u32) {
        self.state.update(|s| s.current_page = page.max(FIRST_PAGE));
    }

    /// Real-time push; unknown ids are ignored
    pub fn update_stream_status(&self, stream_id: &str, status: StreamStatus) {
        self.state.update(|s| {
            if let Some(stream) = s.stream_mut(stream_id) {
                stream.status = status;
            }
        });
    }

    pub fn update_viewer_count(&self, stream_id: &str, viewer_count: u64) {
        self.state.update(|s| {
            if let Some(stream) = s.stream_mut(stream_id) {
                stream.viewer_count = viewer_count;
            }
        });
    }

    pub fn reset_filters(&self) {
        self.state.update(|s| s.filters = LiveFilters::default());
    }

    pub fn active_streams(&self) -> Vec<LiveStream> {
        self.state.read(|s| {
            s.live_streams
                .iter()
                .filter(|stream| stream.status == StreamStatus::Live)
                .cloned()
                .collect()
        })
    }

    pub fn recording_streams(&self) -> Vec<LiveStream> {
        self.state.read(|s| {
            s.live_streams
                .iter()
                .filter(|stream| stream.recording_status == RecordingStatus::Recording)
                .cloned()
                .collect()
        })
    }

    pub fn online_rooms(&self) -> Vec<LiveRoom> {
        self.state.read(|s| {
            s.live_rooms
                .iter()
                .filter(|room| room.status == RoomStatus::Online)
                .cloned()
                .collect()
        })
    }

    pub fn pagination_info(&self) -> Pagination {
        self.state
            .read(|s| Pagination::new(s.current_page, s.page_size, s.total_streams))
    }

    fn set_recording_status(&self, stream_id: &str, status: RecordingStatus) {
        self.state.update(|s| {
            if let Some(stream) = s.stream_mut(stream_id) {
                stream.recording_status = status;
            }
        });
    }
}
