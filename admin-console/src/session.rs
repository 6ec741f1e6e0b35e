//! Authenticated session shared by the HTTP client and the user store

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::auth::UserInfo;
use crate::storage::{keys, KeyValueStore};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub token: String,
    pub refresh_token: String,
    pub user: Option<UserInfo>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Cloneable handle; every clone sees the same session and storage
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

impl SessionHandle {
    /// Rebuilds the session persisted by a previous run.
    ///
    /// The bare token key wins over the token inside the session record, so a
    /// token written by another writer is never shadowed by a stale record.
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut session = match storage.get(keys::SESSION) {
            Some(raw) => serde_json::from_str::<Session>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable persisted session");
                Session::default()
            }),
            None => Session::default(),
        };
        match storage.get(keys::TOKEN) {
            Some(token) => session.token = token,
            None => session.token.clear(),
        }

        debug!(logged_in = session.is_authenticated(), "session restored");

        Self {
            inner: Arc::new(RwLock::new(session)),
            storage,
        }
    }

    pub fn token(&self) -> Option<String> {
        let session = self.inner.read();
        if session.token.is_empty() {
            None
        } else {
            Some(session.token.clone())
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.read().is_authenticated()
    }

    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    pub fn establish(&self, session: Session) {
        let mut current = self.inner.write();
        *current = session;
        self.persist(&current);
    }

    pub fn update_token(&self, token: &str, refresh_token: Option<&str>) {
        let mut current = self.inner.write();
        current.token = token.to_string();
        if let Some(refresh) = refresh_token {
            current.refresh_token = refresh.to_string();
        }
        self.persist(&current);
    }

    pub fn update_user(&self, user: UserInfo) {
        let mut current = self.inner.write();
        if !user.roles.is_empty() {
            current.roles = user.roles.clone();
        }
        if !user.permissions.is_empty() {
            current.permissions = user.permissions.clone();
        }
        current.user = Some(user);
        self.persist(&current);
    }

    /// Drops the in-memory session and both persisted keys
    pub fn clear(&self) {
        *self.inner.write() = Session::default();
        for key in [keys::TOKEN, keys::SESSION] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "failed to remove persisted session key");
            }
        }
        debug!("session cleared");
    }

    fn persist(&self, session: &Session) {
        let result = if session.token.is_empty() {
            self.storage.remove(keys::TOKEN)
        } else {
            self.storage.set(keys::TOKEN, &session.token)
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to persist session token");
        }

        match serde_json::to_string(session) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(keys::SESSION, &raw) {
                    warn!(error = %e, "failed to persist session record");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode session record"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session(token: &str) -> Session {
        Session {
            token: token.to_string(),
            refresh_token: "r-1".to_string(),
            user: Some(UserInfo {
                id: "u1".into(),
                username: "admin".into(),
                ..Default::default()
            }),
            roles: vec!["admin".into()],
            permissions: vec!["media:write".into()],
        }
    }

    #[test]
    fn test_establish_persists_and_restores() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let handle = SessionHandle::restore(storage.clone());
        assert!(!handle.is_logged_in());

        handle.establish(session("t-1"));
        assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("t-1"));

        let restored = SessionHandle::restore(storage);
        assert_eq!(restored.token().as_deref(), Some("t-1"));
        assert_eq!(restored.snapshot().roles, vec!["admin".to_string()]);
    }

    #[test]
    fn test_clear_removes_persisted_keys() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let handle = SessionHandle::restore(storage.clone());
        handle.establish(session("t-1"));

        let other = handle.clone();
        other.clear();

        assert!(handle.token().is_none());
        assert!(storage.get(keys::TOKEN).is_none());
        assert!(storage.get(keys::SESSION).is_none());
    }

    #[test]
    fn test_missing_token_key_means_logged_out() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage
            .set(keys::SESSION, &serde_json::to_string(&session("stale")).unwrap())
            .unwrap();

        let handle = SessionHandle::restore(storage);
        assert!(!handle.is_logged_in());
        assert_eq!(handle.snapshot().refresh_token, "r-1");
    }

    #[test]
    fn test_update_user_keeps_roles_when_profile_has_none() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let handle = SessionHandle::restore(storage);
        handle.establish(session("t-1"));

        handle.update_user(UserInfo {
            nickname: "Ops".into(),
            ..Default::default()
        });

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.roles, vec!["admin".to_string()]);
        assert_eq!(snapshot.user.map(|u| u.nickname), Some("Ops".to_string()));
    }
}
