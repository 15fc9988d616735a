use crate::core::config::ApiConfig;
use crate::core::error::{ApiError, ErrorResponse};
use crate::models::requests::{
    AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, RoleChange, StudentPayload,
    StudentsResponse,
};
use crate::models::user::{Role, UserRecord};
use crate::session::handle::SessionHandle;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// API client for the student-management backend.
///
/// Every request carries `Authorization: Bearer <token>` when the session
/// holds one; login/register go out unauthenticated. A 401 from any endpoint
/// expires the session through the injected `SessionHandle` (the narrow
/// clear-session capability) before the error reaches the caller. No other
/// failure mutates session state.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionHandle>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionHandle>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request with the bearer token attached (when present) and
    /// classify non-2xx statuses. The 401 hook lives here and nowhere else.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let req = match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let response = req.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(ErrorResponse::into_message);

        if status.as_u16() == 401 && self.session.expire() {
            warn!("Received 401, session cleared, returning to login");
        }

        Err(ApiError::from_status(status.as_u16(), message))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(req).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Unexpected(e.to_string()))
    }

    // Auth endpoints

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.fetch(self.client.post(self.url("/auth/login")).json(credentials))
            .await
    }

    pub async fn register(&self, user_data: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.fetch(self.client.post(self.url("/auth/register")).json(user_data))
            .await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.client.post(self.url("/auth/logout")))
            .await
            .map(|_| ())
    }

    // Profile endpoints

    pub async fn get_profile(&self) -> Result<UserRecord, ApiError> {
        self.fetch(self.client.get(self.url("/users/profile"))).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserRecord, ApiError> {
        self.fetch(self.client.put(self.url("/users/profile")).json(update))
            .await
    }

    // Student endpoints (admin only on the backend side)

    pub async fn list_students(&self) -> Result<Vec<UserRecord>, ApiError> {
        let response: StudentsResponse =
            self.fetch(self.client.get(self.url("/students"))).await?;
        Ok(response.students)
    }

    pub async fn get_student(&self, id: &str) -> Result<UserRecord, ApiError> {
        self.fetch(self.client.get(self.url(&format!("/students/{id}"))))
            .await
    }

    pub async fn create_student(&self, student: &StudentPayload) -> Result<UserRecord, ApiError> {
        self.fetch(self.client.post(self.url("/students")).json(student))
            .await
    }

    pub async fn update_student(
        &self,
        id: &str,
        student: &StudentPayload,
    ) -> Result<UserRecord, ApiError> {
        self.fetch(
            self.client
                .put(self.url(&format!("/students/{id}")))
                .json(student),
        )
        .await
    }

    pub async fn delete_student(&self, id: &str) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(&format!("/students/{id}"))))
            .await
            .map(|_| ())
    }

    pub async fn change_role(&self, id: &str, role: Role) -> Result<(), ApiError> {
        self.send(
            self.client
                .put(self.url(&format!("/students/{id}/role")))
                .json(&RoleChange { role }),
        )
        .await
        .map(|_| ())
    }
}
