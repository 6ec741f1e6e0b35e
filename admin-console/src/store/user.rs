use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use super::{LoadingSet, Snapshot};
use crate::api::AuthApi;
use crate::error::{ApiError, Result};
use crate::models::auth::{LoginParams, LoginResponse, UpdateUserInfoParams, UserInfo};
use crate::session::{Session, SessionHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserResource {
    Login,
    Profile,
}

/// Session-facing actions; state lives in the shared [`SessionHandle`]
#[derive(Debug)]
pub struct UserStore {
    api: AuthApi,
    session: SessionHandle,
    revision: AtomicU64,
    loading: LoadingSet<UserResource>,
}

impl UserStore {
    pub fn new(api: AuthApi, session: SessionHandle) -> Self {
        Self {
            api,
            session,
            revision: AtomicU64::new(0),
            loading: LoadingSet::default(),
        }
    }

    pub fn snapshot(&self) -> Snapshot<Session> {
        Snapshot {
            revision: self.revision.load(Ordering::SeqCst),
            state: self.session.snapshot(),
        }
    }

    pub fn is_loading(&self, resource: UserResource) -> bool {
        self.loading.is_loading(resource)
    }

    pub async fn login(&self, params: &LoginParams) -> Result<LoginResponse> {
        let _loading = self.loading.begin(UserResource::Login);
        let response = self.api.login(params).await?;

        self.session.establish(Session {
            token: response.token.clone(),
            refresh_token: response.refresh_token.clone(),
            user: Some(response.user_info.clone()),
            roles: response.user_info.roles.clone(),
            permissions: response.user_info.permissions.clone(),
        });
        self.bump();
        info!(username = %response.user_info.username, "logged in");
        Ok(response)
    }

    /// Local state is reset even when the remote call fails
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "remote logout failed");
        }
        self.reset();
    }

    pub async fn get_user_info(&self) -> Result<UserInfo> {
        let _loading = self.loading.begin(UserResource::Profile);
        let user = self.api.get_current_user().await?;
        self.session.update_user(user.clone());
        self.bump();
        Ok(user)
    }

    /// Uses the returned profile; a body without an id only overlays the
    /// submitted fields onto the current one
    pub async fn update_user_info(&self, params: &UpdateUserInfoParams) -> Result<UserInfo> {
        let _loading = self.loading.begin(UserResource::Profile);
        let returned = self.api.update_user_info(params).await?;

        let user = if returned.id.is_empty() {
            let mut current = self.session.snapshot().user.unwrap_or_default();
            params.apply_to(&mut current);
            current
        } else {
            returned
        };
        self.session.update_user(user.clone());
        self.bump();
        Ok(user)
    }

    pub async fn refresh_session(&self) -> Result<String> {
        let refresh_token = self.session.snapshot().refresh_token;
        if refresh_token.is_empty() {
            return Err(ApiError::Request("no refresh token in session".into()));
        }

        let refreshed = self.api.refresh_token(&refresh_token).await?;
        self.session
            .update_token(&refreshed.token, refreshed.refresh_token.as_deref());
        self.bump();
        Ok(refreshed.token)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.session
            .snapshot()
            .permissions
            .iter()
            .any(|p| p == permission)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.session.snapshot().roles.iter().any(|r| r == role)
    }

    pub fn reset(&self) {
        self.session.clear();
        self.bump();
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn user_name(&self) -> String {
        self.session
            .snapshot()
            .user
            .map(|u| u.username)
            .unwrap_or_default()
    }

    pub fn user_id(&self) -> String {
        self.session
            .snapshot()
            .user
            .map(|u| u.id)
            .unwrap_or_default()
    }

    pub fn avatar(&self) -> String {
        self.session
            .snapshot()
            .user
            .map(|u| u.avatar)
            .unwrap_or_default()
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }
}
