//! Peer-connection bookkeeping for live streams.
//!
//! The console only tracks one peer per stream id. Media transport,
//! renegotiation and ICE restarts belong to whatever [`PeerConnection`]
//! implementation an embedding layer plugs in.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RtcConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServer {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// STUN only; there is no TURN relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcConfiguration {
    pub ice_servers: Vec<IceServer>,
}

impl Default for RtcConfiguration {
    fn default() -> Self {
        Self::from(&RtcConfig::default())
    }
}

impl From<&RtcConfig> for RtcConfiguration {
    fn from(config: &RtcConfig) -> Self {
        Self {
            ice_servers: vec![IceServer {
                urls: config.stun_urls.clone(),
                username: None,
                credential: None,
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    New,
    Connecting,
    Connected,
    Closed,
}

pub trait PeerConnection: Send + Sync + fmt::Debug {
    fn stream_id(&self) -> &str;
    fn configuration(&self) -> &RtcConfiguration;
    fn state(&self) -> PeerState;
    fn close(&self);
}

pub trait PeerConnectionFactory: Send + Sync {
    fn create(&self, stream_id: &str, configuration: &RtcConfiguration) -> Arc<dyn PeerConnection>;
}

/// Tracks configuration and state only
#[derive(Debug)]
pub struct SignalingPeer {
    stream_id: String,
    configuration: RtcConfiguration,
    state: Mutex<PeerState>,
}

impl SignalingPeer {
    pub fn new(stream_id: &str, configuration: RtcConfiguration) -> Self {
        Self {
            stream_id: stream_id.to_string(),
            configuration,
            state: Mutex::new(PeerState::New),
        }
    }

    pub fn set_state(&self, state: PeerState) {
        *self.state.lock() = state;
    }
}

impl PeerConnection for SignalingPeer {
    fn stream_id(&self) -> &str {
        &self.stream_id
    }

    fn configuration(&self) -> &RtcConfiguration {
        &self.configuration
    }

    fn state(&self) -> PeerState {
        *self.state.lock()
    }

    fn close(&self) {
        *self.state.lock() = PeerState::Closed;
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SignalingPeerFactory;

impl PeerConnectionFactory for SignalingPeerFactory {
    fn create(&self, stream_id: &str, configuration: &RtcConfiguration) -> Arc<dyn PeerConnection> {
        Arc::new(SignalingPeer::new(stream_id, configuration.clone()))
    }
}

/// One peer per stream id
pub struct PeerRegistry {
    factory: Arc<dyn PeerConnectionFactory>,
    configuration: RtcConfiguration,
    peers: RwLock<HashMap<String, Arc<dyn PeerConnection>>>,
}

impl fmt::Debug for PeerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerRegistry")
            .field("configuration", &self.configuration)
            .field("peers", &self.len())
            .finish()
    }
}

impl Default for PeerRegistry {
    fn default() -> Self {
        Self::new(Arc::new(SignalingPeerFactory), RtcConfiguration::default())
    }
}

impl PeerRegistry {
    pub fn new(factory: Arc<dyn PeerConnectionFactory>, configuration: RtcConfiguration) -> Self {
        Self {
            factory,
            configuration,
            peers: RwLock::new(HashMap::new()),
        }
    }

    /// A peer already registered for `stream_id` is closed and replaced
    pub fn create(&self, stream_id: &str) -> Arc<dyn PeerConnection> {
        let peer = self.factory.create(stream_id, &self.configuration);
        let previous = self
            .peers
            .write()
            .insert(stream_id.to_string(), Arc::clone(&peer));
        if let Some(old) = previous {
            debug!(stream_id, "replacing existing peer connection");
            old.close();
        }
        info!(stream_id, "peer connection created");
        peer
    }

    pub fn close(&self, stream_id: &str) -> bool {
        match self.peers.write().remove(stream_id) {
            Some(peer) => {
                peer.close();
                info!(stream_id, "peer connection closed");
                true
            }
            None => false,
        }
    }

    pub fn get(&self, stream_id: &str) -> Option<Arc<dyn PeerConnection>> {
        self.peers.read().get(stream_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }

    pub fn close_all(&self) {
        let drained: Vec<_> = self.peers.write().drain().collect();
        for (_, peer) in drained {
            peer.close();
        }
    }

    pub fn configuration(&self) -> &RtcConfiguration {
        &self.configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration_is_single_public_stun() {
        let config = RtcConfiguration::default();
        assert_eq!(config.ice_servers.len(), 1);
        assert_eq!(
            config.ice_servers[0].urls,
            vec!["stun:stun.l.google.com:19302".to_string()]
        );
        assert!(config.ice_servers[0].credential.is_none());
    }

    #[test]
    fn test_create_over_existing_id_closes_old_peer() {
        let registry = PeerRegistry::default();
        let first = registry.create("s1");
        let second = registry.create("s1");

        assert_eq!(first.state(), PeerState::Closed);
        assert_eq!(second.state(), PeerState::New);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_close_removes_entry() {
        let registry = PeerRegistry::default();
        let peer = registry.create("s1");
        registry.create("s2");

        assert!(registry.close("s1"));
        assert!(!registry.close("s1"));
        assert_eq!(peer.state(), PeerState::Closed);
        assert!(registry.get("s1").is_none());
        assert!(registry.get("s2").is_some());

        registry.close_all();
        assert!(registry.is_empty());
    }
}
