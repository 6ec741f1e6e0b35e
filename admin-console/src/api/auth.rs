use crate::error::Result;
use crate::http::ApiClient;
use crate::models::auth::{
    Captcha, ChangePasswordParams, EmailBody, LoginParams, LoginResponse, RefreshTokenBody,
    RefreshTokenResponse, RegisterParams, ResetPasswordBody, TokenBody, UpdateUserInfoParams,
    UserInfo,
};
use crate::models::Ack;

const BASE: &str = "/api/v1/auth";

/// Auth service: login, registration, profile and password flows
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, params: &LoginParams) -> Result<LoginResponse> {
        self.client.post(&format!("{}/login", BASE), params).await
    }

    pub async fn register(&self, params: &RegisterParams) -> Result<Ack> {
        self.client.post(&format!("{}/register", BASE), params).await
    }

    pub async fn get_captcha(&self) -> Result<Captcha> {
        self.client.get(&format!("{}/captcha", BASE)).await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshTokenResponse> {
        self.client
            .post(&format!("{}/refresh", BASE), &RefreshTokenBody { refresh_token })
            .await
    }

    pub async fn logout(&self) -> Result<Ack> {
        self.client.post_empty(&format!("{}/logout", BASE)).await
    }

    pub async fn get_current_user(&self) -> Result<UserInfo> {
        self.client.get(&format!("{}/userinfo", BASE)).await
    }

    pub async fn update_user_info(&self, params: &UpdateUserInfoParams) -> Result<UserInfo> {
        self.client.put(&format!("{}/userinfo", BASE), params).await
    }

    pub async fn change_password(&self, params: &ChangePasswordParams) -> Result<Ack> {
        self.client.put(&format!("{}/password", BASE), params).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Ack> {
        self.client
            .post(&format!("{}/forgot-password", BASE), &EmailBody { email })
            .await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<Ack> {
        self.client
            .post(
                &format!("{}/reset-password", BASE),
                &ResetPasswordBody { token, new_password },
            )
            .await
    }

    pub async fn validate_token(&self, token: &str) -> Result<Ack> {
        self.client
            .post(&format!("{}/validate", BASE), &TokenBody { token })
            .await
    }
}
