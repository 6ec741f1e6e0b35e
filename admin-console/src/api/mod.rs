//! One typed adapter per backend service, all sharing a single [`ApiClient`]

pub mod ai;
pub mod auth;
pub mod live;
pub mod media;
pub mod monitor;

pub use ai::{AiApi, ContentInput};
pub use auth::AuthApi;
pub use live::LiveApi;
pub use media::MediaApi;
pub use monitor::MonitorApi;

use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct Api {
    pub auth: AuthApi,
    pub media: MediaApi,
    pub live: LiveApi,
    pub ai: AiApi,
    pub monitor: MonitorApi,
    client: ApiClient,
}

impl Api {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthApi::new(client.clone()),
            media: MediaApi::new(client.clone()),
            live: LiveApi::new(client.clone()),
            ai: AiApi::new(client.clone()),
            monitor: MonitorApi::new(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}
