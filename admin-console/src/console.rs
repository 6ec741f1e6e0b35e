use std::sync::Arc;

use tracing::info;

use crate::api::Api;
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::http::{ApiClient, InFlightTracker};
use crate::notice::{Notifier, TracingNotifier};
use crate::router::Router;
use crate::rtc::{PeerConnectionFactory, PeerRegistry, RtcConfiguration, SignalingPeerFactory};
use crate::session::SessionHandle;
use crate::storage::{FileStore, KeyValueStore};
use crate::store::{AppStore, ErrorLog, LiveStore, MediaStore, UserStore};

/// Everything a front end needs: one shared client, the typed APIs and the
/// four stores over a single persisted session
#[derive(Debug, Clone)]
pub struct Console {
    config: Arc<ConsoleConfig>,
    session: SessionHandle,
    api: Api,
    app: Arc<AppStore>,
    user: Arc<UserStore>,
    media: Arc<MediaStore>,
    live: Arc<LiveStore>,
    router: Router,
}

pub struct ConsoleBuilder {
    config: ConsoleConfig,
    storage: Option<Arc<dyn KeyValueStore>>,
    notifier: Arc<dyn Notifier>,
    peer_factory: Arc<dyn PeerConnectionFactory>,
}

impl ConsoleBuilder {
    /// Defaults to a [`FileStore`] at `storage.path`
    pub fn storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn peer_factory(mut self, factory: Arc<dyn PeerConnectionFactory>) -> Self {
        self.peer_factory = factory;
        self
    }

    pub fn build(self) -> Result<Console, ConsoleError> {
        let storage = match self.storage {
            Some(storage) => storage,
            None => Arc::new(FileStore::open(&self.config.storage.path)?),
        };

        let session = SessionHandle::restore(Arc::clone(&storage));
        let in_flight = InFlightTracker::new();
        let error_log = ErrorLog::new();

        let client = ApiClient::builder(&self.config.api, session.clone())
            .notifier(self.notifier)
            .in_flight(in_flight.clone())
            .error_log(error_log.clone())
            .build()?;
        let api = Api::new(client);

        let app = AppStore::new(&self.config.app, storage, in_flight, error_log);
        app.init_app_settings();

        let peers = Arc::new(PeerRegistry::new(
            self.peer_factory,
            RtcConfiguration::from(&self.config.rtc),
        ));

        let console = Console {
            user: Arc::new(UserStore::new(api.auth.clone(), session.clone())),
            media: Arc::new(MediaStore::new(api.media.clone())),
            live: Arc::new(LiveStore::new(api.live.clone(), peers)),
            app: Arc::new(app),
            api,
            session,
            router: Router,
            config: Arc::new(self.config),
        };
        info!(
            base_url = %console.config.api.base_url,
            logged_in = console.session.is_logged_in(),
            "console ready"
        );
        Ok(console)
    }
}

impl Console {
    pub fn builder(config: ConsoleConfig) -> ConsoleBuilder {
        ConsoleBuilder {
            config,
            storage: None,
            notifier: Arc::new(TracingNotifier),
            peer_factory: Arc::new(SignalingPeerFactory),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn app(&self) -> &AppStore {
        &self.app
    }

    pub fn user(&self) -> &UserStore {
        &self.user
    }

    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    pub fn live(&self) -> &LiveStore {
        &self.live
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn chunk_size(&self) -> u64 {
        self.config.upload.chunk_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{keys, MemoryStore};

    #[test]
    fn test_build_restores_session_and_settings() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(keys::TOKEN, "persisted").unwrap();
        storage.set(keys::THEME, "light").unwrap();

        let console = Console::builder(ConsoleConfig::default())
            .storage(storage)
            .build()
            .unwrap();

        assert!(console.session().is_logged_in());
        assert!(console.user().is_logged_in());
        assert!(console.app().is_light_theme());
        assert_eq!(console.chunk_size(), 5 * 1024 * 1024);
        assert_eq!(console.api().client().base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_build_opens_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ConsoleConfig::default();
        config.storage.path = dir.path().join("state.json");

        let console = Console::builder(config).build().unwrap();
        assert!(!console.session().is_logged_in());
        console.app().toggle_sidebar();
        assert!(dir.path().join("state.json").exists());
    }
}
