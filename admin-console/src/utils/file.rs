use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::info;

use crate::error::StorageError;
use crate::models::media::{MediaKind, UploadFile};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "mkv", "webm"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "aac", "flac", "m4a"];

/// Text after the last dot; empty for dotfiles and names without one
pub fn get_file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[idx + 1..],
        _ => "",
    }
}

pub fn get_file_type(file_name: &str) -> MediaKind {
    let ext = get_file_extension(file_name).to_ascii_lowercase();
    let ext = ext.as_str();
    if IMAGE_EXTENSIONS.contains(&ext) {
        MediaKind::Image
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        MediaKind::Audio
    } else {
        MediaKind::Document
    }
}

/// Number of chunks for a chunked upload; an empty file still sends one
#[allow(clippy::cast_possible_truncation)]
pub fn chunk_count(file_size: u64, chunk_size: u64) -> u32 {
    if chunk_size == 0 {
        return 1;
    }
    file_size.div_ceil(chunk_size).clamp(1, u64::from(u32::MAX)) as u32
}

/// `data:<mime>;base64,<payload>`
pub fn image_data_url(file: &UploadFile) -> String {
    let mime = file
        .mime_type
        .as_deref()
        .unwrap_or_else(|| guess_image_mime(&file.file_name));
    format!("data:{};base64,{}", mime, STANDARD.encode(&file.content))
}

fn guess_image_mime(file_name: &str) -> &'static str {
    match get_file_extension(file_name).to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Writes a downloaded body to `dir/file_name`, creating `dir` if needed
pub async fn save_download(
    dir: impl AsRef<Path>,
    file_name: &str,
    content: &[u8],
) -> Result<std::path::PathBuf, StorageError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    // keep only the final component of server-supplied names
    let name = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "download".to_string());
    let target = dir.join(name);

    tokio::fs::write(&target, content).await?;
    info!(path = %target.display(), bytes = content.len(), "download saved");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("clip.final.MP4"), "MP4");
        assert_eq!(get_file_extension("README"), "");
        assert_eq!(get_file_extension(".env"), "");
        assert_eq!(get_file_extension("trailing."), "");
    }

    #[test]
    fn test_get_file_type() {
        assert_eq!(get_file_type("cover.PNG"), MediaKind::Image);
        assert_eq!(get_file_type("show.mkv"), MediaKind::Video);
        assert_eq!(get_file_type("track.flac"), MediaKind::Audio);
        assert_eq!(get_file_type("notes.pdf"), MediaKind::Document);
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(0, 5), 1);
        assert_eq!(chunk_count(10, 5), 2);
        assert_eq!(chunk_count(11, 5), 3);
        assert_eq!(chunk_count(11, 0), 1);
    }

    #[test]
    fn test_image_data_url() {
        let file = UploadFile::new("dot.png", vec![0u8, 1, 2]);
        assert_eq!(image_data_url(&file), "data:image/png;base64,AAEC");

        let typed = UploadFile::new("blob", vec![255u8]).with_mime("image/webp");
        assert_eq!(image_data_url(&typed), "data:image/webp;base64,/w==");
    }

    #[tokio::test]
    async fn test_save_download_strips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_download(dir.path().join("out"), "../../evil.bin", b"abc")
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("out").join("evil.bin"));
        assert_eq!(std::fs::read(path).unwrap(), b"abc");
    }
}
