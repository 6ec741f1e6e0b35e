//! Shared setup for the integration tests: a console wired to a wiremock
//! backend over in-memory storage.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::broadcast;
use wiremock::MockServer;

use admin_console::config::ConsoleConfig;
use admin_console::notice::{BroadcastNotifier, Notice};
use admin_console::storage::{keys, KeyValueStore, MemoryStore};
use admin_console::Console;

pub struct TestConsole {
    pub server: MockServer,
    pub storage: Arc<MemoryStore>,
    pub notices: broadcast::Receiver<Notice>,
    pub console: Console,
}

impl TestConsole {
    pub async fn start() -> Self {
        Self::start_with(None).await
    }

    pub async fn logged_in(token: &str) -> Self {
        Self::start_with(Some(token)).await
    }

    async fn start_with(token: Option<&str>) -> Self {
        let server = MockServer::start().await;
        let (console, storage, notices) = build(&server.uri(), token);
        Self {
            server,
            storage,
            notices,
            console,
        }
    }

    /// Every notice emitted so far
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut out = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            out.push(notice);
        }
        out
    }
}

/// Console against an arbitrary base URL, for unreachable-backend tests
pub fn build(
    base_url: &str,
    token: Option<&str>,
) -> (Console, Arc<MemoryStore>, broadcast::Receiver<Notice>) {
    let storage = Arc::new(MemoryStore::new());
    if let Some(token) = token {
        storage.set(keys::TOKEN, token).unwrap();
    }

    let notifier = Arc::new(BroadcastNotifier::new(256));
    let notices = notifier.subscribe();

    let mut config = ConsoleConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_secs = 5;

    let console = Console::builder(config)
        .storage(storage.clone())
        .notifier(notifier)
        .build()
        .unwrap();
    (console, storage, notices)
}

pub fn ok(data: Value) -> Value {
    json!({
        "code": 200,
        "message": "success",
        "data": data,
        "timestamp": 1_700_000_000_000i64
    })
}

pub fn page(items: Vec<Value>, total: u64) -> Value {
    let size = items.len();
    ok(json!({
        "items": items,
        "total": total,
        "page": 1,
        "size": size,
        "totalPages": 1
    }))
}

pub fn media_file(id: &str, file_type: &str) -> Value {
    json!({
        "id": id,
        "name": format!("{}.bin", id),
        "originalName": format!("{}.bin", id),
        "fileType": file_type,
        "mimeType": "application/octet-stream",
        "fileSize": 1024,
        "status": "completed",
        "uploadTime": "2024-05-01T10:00:00Z",
        "uploadBy": "admin",
        "tags": []
    })
}

pub fn live_stream(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("stream {}", id),
        "streamUrl": format!("rtmp://push.local/live/{}", id),
        "playbackUrl": format!("https://play.local/{}.m3u8", id),
        "status": status,
        "recordingStatus": "idle",
        "viewerCount": 0,
        "createTime": "2024-05-01T10:00:00Z"
    })
}

pub fn user_info(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "nickname": "Ops",
        "avatar": "https://cdn.local/a.png",
        "email": "ops@avstream.dev",
        "phone": "13812345678",
        "roles": ["admin"],
        "permissions": ["media:write", "live:write"],
        "lastLoginTime": "2024-05-01T10:00:00Z"
    })
}
