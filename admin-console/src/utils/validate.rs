use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("hardcoded email regex is invalid")
});

/// Mainland mobile numbers
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("hardcoded phone regex is invalid"));

pub fn validate_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn validate_phone(phone: &str) -> bool {
    PHONE.is_match(phone)
}

/// Any absolute URL the parser accepts
pub fn validate_url(url: &str) -> bool {
    reqwest::Url::parse(url).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ops@avstream.dev"));
        assert!(!validate_email("ops@avstream"));
        assert!(!validate_email("ops avstream@x.dev"));
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("13812345678"));
        assert!(!validate_phone("12812345678"));
        assert!(!validate_phone("1381234567"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://cdn.avstream.dev/a.mp4"));
        assert!(validate_url("rtmp://push.avstream.dev/live/key"));
        assert!(!validate_url("/relative/path"));
    }
}
