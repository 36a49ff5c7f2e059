use serde::{Deserialize, Serialize};

use super::{json_body, ApiClient, Endpoint, Method, Tag};
use crate::error::Result;
use crate::model::{user::UserEnvelope, Message, User};

pub static LOGIN: Endpoint =
    Endpoint::mutation("login", Method::Post, "/auth/login", &[Tag::Auth, Tag::Users]);
pub static REGISTER: Endpoint = Endpoint::mutation("register", Method::Post, "/auth/register", &[]);
pub static CURRENT_USER: Endpoint = Endpoint::query("getCurrentUser", "/auth/me", &[Tag::Auth]);
pub static VERIFY_SECRET_CODE: Endpoint = Endpoint::mutation(
    "verifySecretCode",
    Method::Post,
    "/auth/verify-secret-code",
    &[Tag::Auth],
);
pub static CHANGE_PASSWORD: Endpoint =
    Endpoint::mutation("changePassword", Method::Put, "/auth/change-password", &[]);
pub static FORGOT_PASSWORD: Endpoint =
    Endpoint::mutation("forgotPassword", Method::Post, "/auth/forgot-password", &[]);
pub static RESET_PASSWORD: Endpoint =
    Endpoint::mutation("resetPassword", Method::Post, "/auth/reset-password", &[]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub reg_no: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub reg_no: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Authentication routes.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    /// Sign in and, on success, record the session. Identity-bound reads
    /// are invalidated only once the new token is in place, so their
    /// re-fetch goes out as the new user.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let value = self
            .client
            .execute(&LOGIN, &[], json_body(credentials)?)
            .await?;
        let response: LoginResponse = serde_json::from_value(value)?;
        self.client
            .session()
            .sign_in(response.token.clone(), response.user.clone())
            .await?;
        self.client.invalidate(LOGIN.invalidates).await;
        info!("Signed in as {}", response.user.reg_no);
        Ok(response)
    }

    pub async fn register(&self, registration: &Registration) -> Result<Message> {
        self.client
            .mutate(&REGISTER, &[], json_body(registration)?)
            .await
    }

    /// Fetch the signed-in user and refresh the cached copy.
    pub async fn current_user(&self) -> Result<User> {
        let envelope: UserEnvelope = self.client.query(&CURRENT_USER, &[], &[]).await?;
        self.client.session().update_user(envelope.user.clone()).await?;
        Ok(envelope.user)
    }

    /// Submit the one-time secret code; success sets the local flag.
    pub async fn verify_secret_code(&self, code: &str) -> Result<Message> {
        let body = serde_json::json!({ "code": code });
        let message = self
            .client
            .mutate(&VERIFY_SECRET_CODE, &[], Some(body))
            .await?;
        self.client.session().set_secret_code_verified(true).await?;
        Ok(message)
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<Message> {
        self.client
            .mutate(&CHANGE_PASSWORD, &[], json_body(change)?)
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Message> {
        let body = serde_json::json!({ "email": email });
        self.client.mutate(&FORGOT_PASSWORD, &[], Some(body)).await
    }

    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<Message> {
        self.client
            .mutate(&RESET_PASSWORD, &[], json_body(reset)?)
            .await
    }

    /// Sign out locally. There is no server round trip. Every cached read
    /// is dropped so nothing fetched as the old user survives.
    pub async fn logout(&self) -> Result<()> {
        self.client.session().teardown().await?;
        self.client.clear_cache();
        Ok(())
    }
}
