//! Multipart file parts that report upload progress as they are streamed

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures::stream;
use reqwest::multipart::Part;
use reqwest::Body;

use crate::error::{ApiError, Result};
use crate::models::media::UploadFile;

/// Called with `(bytes sent, total bytes)` as the body streams out
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

const SLICE_SIZE: usize = 64 * 1024;

/// round(loaded * 100 / total), clamped to 100; an empty total counts as done
pub fn progress_percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (loaded as f64 * 100.0 / total as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Builds the `file` part, streaming the content when progress is wanted
pub fn file_part(file: &UploadFile, on_progress: Option<ProgressFn>) -> Result<Part> {
    let part = match on_progress {
        None => Part::stream_with_length(Body::from(file.content.clone()), file.size()),
        Some(callback) => {
            let total = file.size();
            let sent = Arc::new(AtomicU64::new(0));
            let slices: Vec<Bytes> = (0..file.content.len())
                .step_by(SLICE_SIZE)
                .map(|start| {
                    let end = (start + SLICE_SIZE).min(file.content.len());
                    file.content.slice(start..end)
                })
                .collect();

            let body = stream::iter(slices.into_iter().map(move |slice| {
                let loaded = sent.fetch_add(slice.len() as u64, Ordering::Relaxed) + slice.len() as u64;
                callback(loaded, total);
                Ok::<Bytes, std::io::Error>(slice)
            }));
            Part::stream_with_length(Body::wrap_stream(body), total)
        }
    };

    let part = part.file_name(file.file_name.clone());
    match &file.mime_type {
        Some(mime) => part
            .mime_str(mime)
            .map_err(|e| ApiError::Request(format!("invalid mime type {}: {}", mime, e))),
        None => Ok(part),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent_rounds() {
        assert_eq!(progress_percent(0, 200), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(200, 200), 100);
        assert_eq!(progress_percent(5, 0), 100);
    }

    #[test]
    fn test_file_part_rejects_bad_mime() {
        let file = UploadFile::new("a.bin", vec![1u8, 2, 3]).with_mime("not a mime");
        assert!(file_part(&file, None).is_err());

        let ok = UploadFile::new("a.mp4", vec![1u8, 2, 3]).with_mime("video/mp4");
        assert!(file_part(&ok, None).is_ok());
    }
}
