use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Snapshot, StateCell, DEFAULT_PAGE_SIZE};
use crate::config::AppConfig;
use crate::http::InFlightTracker;
use crate::locales::Locale;
use crate::storage::{keys, KeyValueStore};

pub const ERROR_LOG_CAPACITY: usize = 100;

/// Capped, shared log of rendered failures; the oldest entry goes first
#[derive(Debug, Clone)]
pub struct ErrorLog {
    entries: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::with_capacity(ERROR_LOG_CAPACITY)
    }
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Appends `"<local time>: <message>"`
    pub fn push(&self, message: &str) {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut entries = self.entries.lock();
        entries.push_back(format!("{}: {}", stamp, message));
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Auto,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "auto" => Some(Theme::Auto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Default,
    Sidebar,
    Top,
    Mix,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Default => "default",
            Layout::Sidebar => "sidebar",
            Layout::Top => "top",
            Layout::Mix => "mix",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "default" => Some(Layout::Default),
            "sidebar" => Some(Layout::Sidebar),
            "top" => Some(Layout::Top),
            "mix" => Some(Layout::Mix),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub title: String,
    pub version: String,
    pub build_time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub theme: Theme,
    pub primary_color: String,
    pub layout: Layout,
    pub sidebar_collapsed: bool,
    pub navbar_fixed: bool,
    pub footer_visible: bool,
    pub loading_text: String,
    pub language: String,
    pub page_size: u32,
    pub system_info: SystemInfo,
}

/// UI preferences, global loading state and the error log
pub struct AppStore {
    state: StateCell<AppState>,
    storage: Arc<dyn KeyValueStore>,
    in_flight: InFlightTracker,
    error_log: ErrorLog,
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("state", &self.state)
            .field("error_log", &self.error_log.len())
            .finish()
    }
}

impl AppStore {
    pub fn new(
        app: &AppConfig,
        storage: Arc<dyn KeyValueStore>,
        in_flight: InFlightTracker,
        error_log: ErrorLog,
    ) -> Self {
        let state = AppState {
            theme: Theme::default(),
            primary_color: "#409EFF".to_string(),
            layout: Layout::default(),
            sidebar_collapsed: false,
            navbar_fixed: true,
            footer_visible: true,
            loading_text: Locale::default().translate("common.loading").to_string(),
            language: Locale::default().tag().to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            system_info: SystemInfo {
                title: app.title.clone(),
                version: app.version.clone(),
                build_time: chrono::Utc::now().to_rfc3339(),
            },
        };

        Self {
            state: StateCell::new(state),
            storage,
            in_flight,
            error_log,
        }
    }

    pub fn snapshot(&self) -> Snapshot<AppState> {
        self.state.snapshot()
    }

    /// Restores persisted preferences; unknown values are ignored
    pub fn init_app_settings(&self) {
        let theme = self.storage.get(keys::THEME).and_then(|v| Theme::parse(&v));
        let layout = self.storage.get(keys::LAYOUT).and_then(|v| Layout::parse(&v));
        let language = self.storage.get(keys::LANGUAGE).filter(|v| !v.is_empty());
        let collapsed = self
            .storage
            .get(keys::SIDEBAR_COLLAPSED)
            .and_then(|v| v.parse::<bool>().ok());

        self.state.update(|s| {
            if let Some(theme) = theme {
                s.theme = theme;
            }
            if let Some(layout) = layout {
                s.layout = layout;
            }
            if let Some(language) = language {
                s.language = language;
            }
            if let Some(collapsed) = collapsed {
                s.sidebar_collapsed = collapsed;
            }
        });
        debug!("app settings restored");
    }

    pub fn save_settings(&self) {
        let s = self.state.read(Clone::clone);
        self.persist(keys::THEME, s.theme.as_str());
        self.persist(keys::LAYOUT, s.layout.as_str());
        self.persist(keys::LANGUAGE, &s.language);
        self.persist(keys::SIDEBAR_COLLAPSED, &s.sidebar_collapsed.to_string());
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = self.state.update(|s| {
            s.theme = if s.theme == Theme::Dark {
                Theme::Light
            } else {
                Theme::Dark
            };
            s.theme
        });
        self.persist(keys::THEME, theme.as_str());
        theme
    }

    pub fn set_theme(&self, theme: Theme) {
        self.state.update(|s| s.theme = theme);
        self.persist(keys::THEME, theme.as_str());
    }

    pub fn toggle_sidebar(&self) -> bool {
        let collapsed = self.state.update(|s| {
            s.sidebar_collapsed = !s.sidebar_collapsed;
            s.sidebar_collapsed
        });
        self.persist(keys::SIDEBAR_COLLAPSED, &collapsed.to_string());
        collapsed
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.state.update(|s| s.sidebar_collapsed = collapsed);
        self.persist(keys::SIDEBAR_COLLAPSED, &collapsed.to_string());
    }

    pub fn set_layout(&self, layout: Layout) {
        self.state.update(|s| s.layout = layout);
        self.persist(keys::LAYOUT, layout.as_str());
    }

    pub fn set_language(&self, language: &str) {
        self.state.update(|s| s.language = language.to_string());
        self.persist(keys::LANGUAGE, language);
    }

    pub fn set_loading_text(&self, text: &str) {
        self.state.update(|s| s.loading_text = text.to_string());
    }

    /// True while any request is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_loading()
    }

    pub fn add_error_log(&self, message: &str) {
        self.error_log.push(message);
    }

    pub fn clear_error_logs(&self) {
        self.error_log.clear();
    }

    pub fn error_logs(&self) -> Vec<String> {
        self.error_log.entries()
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    pub fn is_dark_theme(&self) -> bool {
        self.state.read(|s| s.theme == Theme::Dark)
    }

    pub fn is_light_theme(&self) -> bool {
        self.state.read(|s| s.theme == Theme::Light)
    }

    pub fn sidebar_width(&self) -> &'static str {
        if self.state.read(|s| s.sidebar_collapsed) {
            "64px"
        } else {
            "240px"
        }
    }

    pub fn current_language(&self) -> String {
        self.state.read(|s| s.language.clone())
    }

    pub fn locale(&self) -> Locale {
        Locale::from_tag(&self.current_language())
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "failed to persist setting");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store(storage: Arc<dyn KeyValueStore>) -> AppStore {
        AppStore::new(
            &AppConfig::default(),
            storage,
            InFlightTracker::new(),
            ErrorLog::new(),
        )
    }

    #[test]
    fn test_error_log_evicts_oldest_past_capacity() {
        let log = ErrorLog::new();
        for i in 0..=ERROR_LOG_CAPACITY {
            log.push(&format!("failure {}", i));
        }

        let entries = log.entries();
        assert_eq!(entries.len(), ERROR_LOG_CAPACITY);
        assert!(entries[0].ends_with(": failure 1"));
        assert!(entries[ERROR_LOG_CAPACITY - 1].ends_with(": failure 100"));
    }

    #[test]
    fn test_defaults_and_getters() {
        let app = store(Arc::new(MemoryStore::new()));
        assert!(app.is_dark_theme());
        assert_eq!(app.sidebar_width(), "240px");
        assert_eq!(app.current_language(), "zh-CN");
        assert!(!app.is_loading());

        app.toggle_sidebar();
        assert_eq!(app.sidebar_width(), "64px");
        assert_eq!(app.toggle_theme(), Theme::Light);
        assert!(app.is_light_theme());
    }

    #[test]
    fn test_settings_survive_restart() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let app = store(storage.clone());
        app.set_theme(Theme::Light);
        app.set_layout(Layout::Top);
        app.set_language("en-US");
        app.set_sidebar_collapsed(true);

        let restarted = store(storage);
        restarted.init_app_settings();
        let snap = restarted.snapshot();
        assert_eq!(snap.theme, Theme::Light);
        assert_eq!(snap.layout, Layout::Top);
        assert_eq!(snap.language, "en-US");
        assert!(snap.sidebar_collapsed);
        assert_eq!(restarted.locale(), Locale::EnUs);
    }

    #[test]
    fn test_unknown_persisted_theme_is_ignored() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(keys::THEME, "neon").unwrap();
        let app = store(storage);
        app.init_app_settings();
        assert_eq!(app.snapshot().theme, Theme::Dark);
        assert_eq!(app.snapshot().revision, 1);
    }

    #[test]
    fn test_loading_follows_in_flight_requests() {
        let tracker = InFlightTracker::new();
        let app = AppStore::new(
            &AppConfig::default(),
            Arc::new(MemoryStore::new()),
            tracker.clone(),
            ErrorLog::new(),
        );
        let guard = tracker.begin();
        assert!(app.is_loading());
        drop(guard);
        assert!(!app.is_loading());
    }
}
