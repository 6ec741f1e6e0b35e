use chrono::{DateTime, Datelike, TimeZone, Timelike};
use rand::distributions::Alphanumeric;
use rand::Rng;

pub const DEFAULT_TIME_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Binary units up to TB, at most two decimals with trailing zeros dropped
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{:.2}", scaled);
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Substitutes `YYYY MM DD HH mm ss` tokens; everything else is kept literally
pub fn format_time<Tz: TimeZone>(at: &DateTime<Tz>, pattern: &str) -> String {
    pattern
        .replace("YYYY", &at.year().to_string())
        .replace("MM", &format!("{:02}", at.month()))
        .replace("DD", &format!("{:02}", at.day()))
        .replace("HH", &format!("{:02}", at.hour()))
        .replace("mm", &format!("{:02}", at.minute()))
        .replace("ss", &format!("{:02}", at.second()))
}

/// `m:ss`, or `h:mm:ss` from one hour up
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Random ASCII alphanumerics
pub fn generate_id(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Stable `hsl(h, 70%, 50%)` colour for a label
pub fn generate_color(label: &str) -> String {
    let hash = label
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            i32::from(unit).wrapping_add((hash << 5).wrapping_sub(hash))
        });
    format!("hsl({}, 70%, 50%)", hash.rem_euclid(360))
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024 * 1024), "2048 TB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(65.0), "1:05");
        assert_eq!(format_duration(3661.0), "1:01:01");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(-3.0), "0:00");
    }

    #[test]
    fn test_format_time_tokens() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(format_time(&at, DEFAULT_TIME_FORMAT), "2024-03-07 09:05:02");
        assert_eq!(format_time(&at, "YYYY/MM/DD"), "2024/03/07");
    }

    #[test]
    fn test_generate_id_length_and_charset() {
        let id = generate_id(12);
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_color_is_stable() {
        assert_eq!(generate_color("live"), generate_color("live"));
        assert_eq!(generate_color(""), "hsl(0, 70%, 50%)");
        assert!(generate_color("media").starts_with("hsl("));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("stream"), "Stream");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éa"), "Éa");
    }
}
