//! Store actions end to end against a fake backend.
//!
//! Run: cargo test --test store_flow_test

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::{live_stream, media_file, ok, page, user_info, TestConsole};

use admin_console::models::auth::LoginParams;
use admin_console::models::live::{CreateStreamRequest, RecordingOptions, RecordingStatus, StreamStatus};
use admin_console::models::media::{MediaFileQuery, UploadFile, UploadOptions, UploadStatus};
use admin_console::rtc::PeerState;
use admin_console::storage::{keys, KeyValueStore};
use admin_console::store::MediaResource;

#[tokio::test]
async fn test_create_stream_prepends_and_bumps_total() {
    let t = TestConsole::logged_in("tok").await;
    Mock::given(method("GET"))
        .and(path("/live/v1/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![live_stream("s1", "live"), live_stream("s2", "stopped")],
            2,
        )))
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/live/v1/streams"))
        .and(body_partial_json(json!({"name": "launch"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "id": "s9",
            "streamUrl": "rtmp://push.local/live/s9",
            "playbackUrl": "https://play.local/s9.m3u8"
        }))))
        .mount(&t.server)
        .await;

    let live = t.console.live();
    live.fetch_live_streams(None).await.unwrap();
    let before = live.snapshot().revision;

    let created = live
        .create_live_stream(&CreateStreamRequest::new("launch"))
        .await
        .unwrap();
    assert_eq!(created.status, StreamStatus::Idle);
    assert_eq!(created.name, "launch");

    let snap = live.snapshot();
    assert!(snap.revision > before);
    assert_eq!(snap.total_streams, 3);
    let ids: Vec<&str> = snap.live_streams.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s9", "s1", "s2"]);
    assert_eq!(live.active_streams().len(), 1);
}

#[tokio::test]
async fn test_stream_lifecycle_and_recording_flags() {
    let t = TestConsole::logged_in("tok").await;
    Mock::given(method("GET"))
        .and(path("/live/v1/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![live_stream("s1", "idle")], 1)))
        .mount(&t.server)
        .await;
    for action in ["start", "stop"] {
        Mock::given(method("POST"))
            .and(path(format!("/live/v1/streams/s1/{}", action)))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
            .mount(&t.server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/live/v1/recordings/s1/{}", action)))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
            .mount(&t.server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path("/live/v1/streams/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .mount(&t.server)
        .await;

    let live = t.console.live();
    live.fetch_live_streams(None).await.unwrap();

    live.start_live_stream("s1").await.unwrap();
    let snap = live.snapshot();
    let stream = &snap.live_streams[0];
    assert_eq!(stream.status, StreamStatus::Live);
    assert!(stream.start_time.is_some());

    live.start_recording("s1", &RecordingOptions::default()).await.unwrap();
    assert_eq!(live.recording_streams().len(), 1);
    live.stop_recording("s1").await.unwrap();
    assert_eq!(live.snapshot().live_streams[0].recording_status, RecordingStatus::Stopped);

    live.stop_live_stream("s1").await.unwrap();
    let snap = live.snapshot();
    let stream = &snap.live_streams[0];
    assert_eq!(stream.status, StreamStatus::Stopped);
    assert!(stream.end_time.is_some());

    let peer = live.create_webrtc_connection("s1");
    live.delete_live_stream("s1").await.unwrap();
    assert!(live.snapshot().live_streams.is_empty());
    assert_eq!(live.snapshot().total_streams, 0);
    assert_eq!(peer.state(), PeerState::Closed);
    assert!(live.webrtc_connection("s1").is_none());
}

#[tokio::test]
async fn test_delete_media_removes_only_that_file() {
    let t = TestConsole::logged_in("tok").await;
    Mock::given(method("GET"))
        .and(path("/media/v1/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                media_file("a", "video"),
                media_file("b", "audio"),
                media_file("c", "image"),
            ],
            3,
        )))
        .mount(&t.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/media/v1/files/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(null))))
        .expect(1)
        .mount(&t.server)
        .await;

    let media = t.console.media();
    media.fetch_media_files(None).await.unwrap();
    media.delete_media_file("b").await.unwrap();

    let snap = media.snapshot();
    let ids: Vec<&str> = snap.media_files.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(snap.total_count, 2);
    assert!(media.audio_files().is_empty());
    assert_eq!(media.pagination_info().total_pages, 1);
}

#[tokio::test]
async fn test_chunked_upload_runs_init_chunks_merge() {
    let t = TestConsole::logged_in("tok").await;
    Mock::given(method("POST"))
        .and(path("/media/v1/upload/init"))
        .and(body_partial_json(json!({
            "fileName": "clip.mp4",
            "fileSize": 10,
            "chunkSize": 4,
            "totalChunks": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({"fileUuid": "u-1"}))))
        .expect(1)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/media/v1/upload/chunk/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({"fileUuid": "u-1"}))))
        .expect(3)
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/media/v1/upload/merge/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(media_file("merged", "video"))))
        .expect(1)
        .mount(&t.server)
        .await;

    let media = t.console.media();
    let file = UploadFile::new("clip.mp4", vec![1u8; 10]).with_mime("video/mp4");
    let merged = media.upload_chunked(&file, 4).await.unwrap();
    assert_eq!(merged.id, "merged");

    let snap = media.snapshot();
    assert_eq!(snap.media_files.len(), 1);
    assert_eq!(snap.total_count, 1);
    let task = &snap.upload_tasks[0];
    assert_eq!(task.status, UploadStatus::Completed);
    assert_eq!(task.progress, 100);
    assert!(!media.is_loading(MediaResource::Upload));

    media.clear_completed_tasks();
    assert!(media.snapshot().upload_tasks.is_empty());
}

#[tokio::test]
async fn test_failed_chunk_marks_task_failed() {
    let t = TestConsole::logged_in("tok").await;
    Mock::given(method("POST"))
        .and(path("/media/v1/upload/init"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({"fileUuid": "u-2"}))))
        .mount(&t.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/media/v1/upload/chunk/u-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 5001, "message": "disk full"})))
        .mount(&t.server)
        .await;

    let media = t.console.media();
    let file = UploadFile::new("clip.mp4", vec![1u8; 10]);
    let err = media.upload_chunked(&file, 4).await.unwrap_err();
    assert_eq!(err.message(), "disk full");

    let failed = media.failed_tasks();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].error.as_deref(), Some("disk full"));
    assert!(media.snapshot().media_files.is_empty());
}

#[tokio::test]
async fn test_whole_file_upload_tracks_task() {
    let t = TestConsole::logged_in("tok").await;
    Mock::given(method("POST"))
        .and(path("/media/v1/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(media_file("up1", "image"))))
        .expect(1)
        .mount(&t.server)
        .await;

    let media = t.console.media();
    let file = UploadFile::new("cover.png", vec![9u8; 200_000]).with_mime("image/png");
    let options = UploadOptions {
        tags: vec!["cover".into()],
        description: Some("launch cover".into()),
    };
    let uploaded = media.upload_file(&file, &options).await.unwrap();
    assert_eq!(uploaded.id, "up1");

    let snap = media.snapshot();
    assert_eq!(snap.upload_tasks[0].status, UploadStatus::Completed);
    assert_eq!(snap.upload_tasks[0].file_size, 200_000);
    assert_eq!(media.image_files().len(), 1);

    let requests = t.server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"tags\""));
    assert!(body.contains("[\"cover\"]"));
    assert!(body.contains("filename=\"cover.png\""));
}

#[tokio::test]
async fn test_superseded_list_response_is_discarded() {
    let t = TestConsole::logged_in("tok").await;
    Mock::given(method("GET"))
        .and(path("/media/v1/files"))
        .and(query_param("keyword", "old"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![media_file("stale", "video")], 1))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&t.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/v1/files"))
        .and(query_param("keyword", "new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![media_file("fresh", "video")], 1)))
        .mount(&t.server)
        .await;

    let media = t.console.media();
    let old = MediaFileQuery {
        keyword: Some("old".into()),
        ..Default::default()
    };
    let new = MediaFileQuery {
        keyword: Some("new".into()),
        ..Default::default()
    };

    let (first, second) = tokio::join!(media.fetch_media_files(Some(&old)), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        media.fetch_media_files(Some(&new)).await
    });

    // the caller still gets its own page
    assert_eq!(first.unwrap().items[0].id, "stale");
    assert_eq!(second.unwrap().items[0].id, "fresh");
    assert_eq!(media.snapshot().media_files[0].id, "fresh");
    assert!(!media.is_loading(MediaResource::List));
}

#[tokio::test]
async fn test_login_persists_session_and_logout_clears_it() {
    let t = TestConsole::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_partial_json(json!({"username": "ops", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "token": "t-1",
            "refreshToken": "r-1",
            "userInfo": user_info("u1", "ops")
        }))))
        .mount(&t.server)
        .await;
    // remote logout failing must not keep the session alive
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&t.server)
        .await;

    let user = t.console.user();
    user.login(&LoginParams::new("ops", "pw")).await.unwrap();

    assert!(user.is_logged_in());
    assert_eq!(user.user_name(), "ops");
    assert!(user.has_role("admin"));
    assert!(user.has_permission("live:write"));
    assert!(!user.has_permission("ai:admin"));
    assert_eq!(t.storage.get(keys::TOKEN).as_deref(), Some("t-1"));
    assert!(t.storage.get(keys::SESSION).is_some());

    user.logout().await;
    assert!(!user.is_logged_in());
    assert_eq!(user.user_name(), "");
    assert!(t.storage.get(keys::TOKEN).is_none());

    let requests = t.server.received_requests().await.unwrap();
    let logout = requests
        .iter()
        .find(|r| r.url.path() == "/api/v1/auth/logout")
        .unwrap();
    assert_eq!(
        logout.headers.get("authorization").unwrap().to_str().unwrap(),
        "Bearer t-1"
    );
}
