use crate::error::Result;
use crate::http::ApiClient;
use crate::models::live::{
    BindStreamBody, ChatHistoryQuery, ChatMessageRequest, CreateRoomRequest, CreateStreamRequest,
    LiveRecording, LiveRoom, LiveRoomQuery, LiveStats, LiveStream, LiveStreamQuery,
    ModerationBody, PlayUrls, PushUrl, RecordingOptions, RecordingQuery, StreamStatistics,
    UpdateRoomRequest, UpdateStreamRequest,
};
use crate::models::{Ack, Page};

const BASE: &str = "/live/v1";

#[derive(Debug, Clone)]
pub struct LiveApi {
    client: ApiClient,
}

impl LiveApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // Streams

    pub async fn get_live_streams(&self, query: &LiveStreamQuery) -> Result<Page<LiveStream>> {
        self.client
            .get_query(&format!("{}/streams", BASE), query)
            .await
    }

    pub async fn create_live_stream(&self, request: &CreateStreamRequest) -> Result<LiveStream> {
        self.client
            .post(&format!("{}/streams", BASE), request)
            .await
    }

    pub async fn get_live_stream(&self, stream_id: &str) -> Result<LiveStream> {
        self.client
            .get(&format!("{}/streams/{}", BASE, stream_id))
            .await
    }

    pub async fn start_live_stream(&self, stream_id: &str) -> Result<Ack> {
        self.client
            .post_empty(&format!("{}/streams/{}/start", BASE, stream_id))
            .await
    }

    pub async fn stop_live_stream(&self, stream_id: &str) -> Result<Ack> {
        self.client
            .post_empty(&format!("{}/streams/{}/stop", BASE, stream_id))
            .await
    }

    pub async fn delete_live_stream(&self, stream_id: &str) -> Result<Ack> {
        self.client
            .delete(&format!("{}/streams/{}", BASE, stream_id))
            .await
    }

    pub async fn update_live_stream(
        &self,
        stream_id: &str,
        request: &UpdateStreamRequest,
    ) -> Result<LiveStream> {
        self.client
            .put(&format!("{}/streams/{}", BASE, stream_id), request)
            .await
    }

    // Rooms

    pub async fn get_live_rooms(&self, query: &LiveRoomQuery) -> Result<Page<LiveRoom>> {
        self.client
            .get_query(&format!("{}/rooms", BASE), query)
            .await
    }

    pub async fn create_live_room(&self, request: &CreateRoomRequest) -> Result<LiveRoom> {
        self.client.post(&format!("{}/rooms", BASE), request).await
    }

    pub async fn get_live_room(&self, room_id: &str) -> Result<LiveRoom> {
        self.client
            .get(&format!("{}/rooms/{}", BASE, room_id))
            .await
    }

    pub async fn update_live_room(
        &self,
        room_id: &str,
        request: &UpdateRoomRequest,
    ) -> Result<LiveRoom> {
        self.client
            .put(&format!("{}/rooms/{}", BASE, room_id), request)
            .await
    }

    pub async fn delete_live_room(&self, room_id: &str) -> Result<Ack> {
        self.client
            .delete(&format!("{}/rooms/{}", BASE, room_id))
            .await
    }

    pub async fn bind_stream_to_room(&self, room_id: &str, stream_id: &str) -> Result<Ack> {
        self.client
            .post(
                &format!("{}/rooms/{}/bind-stream", BASE, room_id),
                &BindStreamBody { stream_id },
            )
            .await
    }

    pub async fn unbind_stream_from_room(&self, room_id: &str) -> Result<Ack> {
        self.client
            .post_empty(&format!("{}/rooms/{}/unbind-stream", BASE, room_id))
            .await
    }

    // Recordings

    pub async fn start_recording(
        &self,
        stream_id: &str,
        options: &RecordingOptions,
    ) -> Result<Ack> {
        self.client
            .post(&format!("{}/recordings/{}/start", BASE, stream_id), options)
            .await
    }

    pub async fn stop_recording(&self, stream_id: &str) -> Result<Ack> {
        self.client
            .post_empty(&format!("{}/recordings/{}/stop", BASE, stream_id))
            .await
    }

    pub async fn get_recordings(&self, query: &RecordingQuery) -> Result<Page<LiveRecording>> {
        self.client
            .get_query(&format!("{}/recordings", BASE), query)
            .await
    }

    pub async fn get_recording(&self, recording_id: &str) -> Result<LiveRecording> {
        self.client
            .get(&format!("{}/recordings/{}", BASE, recording_id))
            .await
    }

    pub async fn delete_recording(&self, recording_id: &str) -> Result<Ack> {
        self.client
            .delete(&format!("{}/recordings/{}", BASE, recording_id))
            .await
    }

    // Statistics and playback

    pub async fn get_live_stats(&self) -> Result<LiveStats> {
        self.client.get(&format!("{}/stats", BASE)).await
    }

    pub async fn get_stream_stats(&self, stream_id: &str) -> Result<StreamStatistics> {
        self.client
            .get(&format!("{}/streams/{}/stats", BASE, stream_id))
            .await
    }

    pub async fn get_push_url(&self, stream_id: &str) -> Result<PushUrl> {
        self.client
            .get(&format!("{}/streams/{}/push-url", BASE, stream_id))
            .await
    }

    pub async fn get_play_urls(&self, stream_id: &str) -> Result<PlayUrls> {
        self.client
            .get(&format!("{}/streams/{}/play-urls", BASE, stream_id))
            .await
    }

    // Chat and moderation

    pub async fn send_chat_message(
        &self,
        room_id: &str,
        message: &ChatMessageRequest,
    ) -> Result<Ack> {
        self.client
            .post(&format!("{}/rooms/{}/chat", BASE, room_id), message)
            .await
    }

    /// Chat records are passed through untouched
    pub async fn get_chat_history(&self, room_id: &str, query: &ChatHistoryQuery) -> Result<Ack> {
        self.client
            .get_query(&format!("{}/rooms/{}/chat/history", BASE, room_id), query)
            .await
    }

    pub async fn mute_user(
        &self,
        room_id: &str,
        user_id: &str,
        duration_secs: Option<u64>,
    ) -> Result<Ack> {
        self.client
            .post(
                &format!("{}/rooms/{}/mute", BASE, room_id),
                &ModerationBody {
                    user_id,
                    duration: duration_secs,
                },
            )
            .await
    }

    pub async fn unmute_user(&self, room_id: &str, user_id: &str) -> Result<Ack> {
        self.client
            .post(
                &format!("{}/rooms/{}/unmute", BASE, room_id),
                &ModerationBody {
                    user_id,
                    duration: None,
                },
            )
            .await
    }

    pub async fn kick_user(&self, room_id: &str, user_id: &str) -> Result<Ack> {
        self.client
            .post(
                &format!("{}/rooms/{}/kick", BASE, room_id),
                &ModerationBody {
                    user_id,
                    duration: None,
                },
            )
            .await
    }
}
