//! ApiClient: REST calls against the TimePilot backend.
//!
//! Every request is a POST carrying `X-Device-Id` and, once logged in,
//! a bearer token loaded from the [`CredentialStore`].

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::credentials::{AuthTokens, CredentialStore};
use super::types::{
    AdHocEventVo, BaseResponse, DeleteEventBody, EmailCodeResponse, EventBody, HabitualEventVo,
    LoginRequest, LoginResponse, PlannedEventVo, RefreshTokenRequest, RefreshTokenResponse,
    RegisterRequest, RegisterResponse, SmartDailyPlanRequest,
};
use crate::error::ApiError;
use crate::event::{CreateEvent, DeleteEvent, EventKind, UpdateEvent};
use crate::storage::Config;

const DEVICE_ID_HEADER: &str = "X-Device-Id";

const LOGIN: &str = "/api/user/auth/login";
const REGISTER: &str = "/api/user/auth/register";
const SEND_EMAIL_CODE: &str = "/api/user/auth/sendEmailCode";
const REFRESH_TOKEN: &str = "/api/user/auth/refreshToken";
const SMART_DAILY_PLAN: &str = "/api/time-plan/smart-daily-plan";

fn event_path(kind: EventKind, action: &str) -> String {
    format!("/api/{}/{action}", kind.resource())
}

/// Client for the TimePilot backend.
pub struct ApiClient {
    http_client: Client,
    base_url: Url,
    device_id: String,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Create a client with the default request timeout.
    pub fn new(
        base_url: &str,
        device_id: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, device_id, credentials, Duration::from_secs(15))
    }

    pub fn with_timeout(
        base_url: &str,
        device_id: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            http_client: Client::builder().timeout(timeout).build()?,
            base_url: Url::parse(base_url)?,
            device_id: device_id.into(),
            credentials,
        })
    }

    /// Build from the `[api]` section of the config.
    pub fn from_config(
        config: &Config,
        device_id: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        Self::with_timeout(
            &config.api.base_url,
            device_id,
            credentials,
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Whether tokens are currently stored.
    pub fn is_logged_in(&self) -> Result<bool, ApiError> {
        Ok(self.credentials.load()?.is_some())
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.base_url.join(path)?;
        let mut request = self
            .http_client
            .post(url)
            .header(DEVICE_ID_HEADER, &self.device_id);
        if let Some(tokens) = self.credentials.load()? {
            request = request.bearer_auth(&tokens.access_token);
        }
        Ok(request)
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<R, ApiError> {
        tracing::debug!(endpoint = path, "sending request");
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(endpoint = path, status = status.as_u16(), "request failed");
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    /// Send and unwrap the `{code, info, data}` envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let envelope: BaseResponse<T> = self.execute(path, request).await?;
        envelope.into_data(path)
    }

    /// Log in and store the issued tokens.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = self.post(LOGIN)?.json(&body);
        let resp: LoginResponse = self.execute(LOGIN, request).await?;
        if !resp.is_success() {
            return Err(ApiError::Rejected {
                endpoint: LOGIN.to_string(),
                code: resp.code,
                message: resp.message,
            });
        }

        self.credentials.save(&AuthTokens {
            access_token: resp.access_token.clone(),
            refresh_token: resp.refresh_token.clone(),
        })?;
        tracing::info!(username, "logged in");
        Ok(resp)
    }

    /// Register a new account. Returns the backend's message.
    pub async fn register(&self, form: &RegisterRequest) -> Result<String, ApiError> {
        let request = self.post(REGISTER)?.json(form);
        let resp: RegisterResponse = self.execute(REGISTER, request).await?;
        let message = resp.message.clone().unwrap_or_default();
        if !resp.is_success() {
            return Err(ApiError::Rejected {
                endpoint: REGISTER.to_string(),
                code: resp.code,
                message,
            });
        }
        tracing::info!(username = %form.username, "account registered");
        Ok(message)
    }

    /// Ask the backend to mail a verification code.
    pub async fn send_email_code(&self, email: &str) -> Result<String, ApiError> {
        let request = self.post(SEND_EMAIL_CODE)?.form(&[("email", email)]);
        let resp: EmailCodeResponse = self.execute(SEND_EMAIL_CODE, request).await?;
        let message = resp.info.clone().unwrap_or_default();
        if !resp.is_success() || resp.data == Some(false) {
            return Err(ApiError::Rejected {
                endpoint: SEND_EMAIL_CODE.to_string(),
                code: resp.code,
                message,
            });
        }
        Ok(message)
    }

    /// Exchange the stored refresh token for a new pair.
    pub async fn refresh_tokens(&self) -> Result<AuthTokens, ApiError> {
        let current = self.credentials.load()?.ok_or(ApiError::NotAuthenticated)?;
        let body = RefreshTokenRequest {
            refresh_token: current.refresh_token,
        };
        let request = self.post(REFRESH_TOKEN)?.json(&body);
        let resp: RefreshTokenResponse = self.execute(REFRESH_TOKEN, request).await?;
        if !resp.is_success() {
            return Err(ApiError::Rejected {
                endpoint: REFRESH_TOKEN.to_string(),
                code: resp.code,
                message: resp.message,
            });
        }

        let tokens = AuthTokens {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
        };
        self.credentials.save(&tokens)?;
        tracing::info!("tokens refreshed");
        Ok(tokens)
    }

    /// Forget stored tokens. Local only; the backend keeps no session.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.credentials.clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    pub async fn list_habitual_events(&self) -> Result<Vec<HabitualEventVo>, ApiError> {
        let path = event_path(EventKind::Habitual, "list");
        self.call(&path, self.post(&path)?).await
    }

    pub async fn list_ad_hoc_events(&self) -> Result<Vec<AdHocEventVo>, ApiError> {
        let path = event_path(EventKind::AdHoc, "list");
        self.call(&path, self.post(&path)?).await
    }

    /// Create an event; returns the id the backend assigned.
    pub async fn create_event(&self, cmd: &CreateEvent) -> Result<i64, ApiError> {
        let path = event_path(cmd.kind(), "create");
        let request = self.post(&path)?.json(&EventBody::create(cmd));
        let id: i64 = self.call(&path, request).await?;
        tracing::info!(kind = %cmd.kind(), event_id = id, "event created");
        Ok(id)
    }

    pub async fn update_event(&self, cmd: &UpdateEvent) -> Result<bool, ApiError> {
        let path = event_path(cmd.kind(), "update");
        let request = self.post(&path)?.json(&EventBody::update(cmd));
        let updated: bool = self.call(&path, request).await?;
        tracing::info!(kind = %cmd.kind(), event_id = cmd.event_id(), updated, "event updated");
        Ok(updated)
    }

    pub async fn delete_event(&self, cmd: &DeleteEvent) -> Result<bool, ApiError> {
        let path = event_path(cmd.kind(), "delete");
        let body = DeleteEventBody {
            event_id: cmd.event_id(),
        };
        let deleted: bool = self.call(&path, self.post(&path)?.json(&body)).await?;
        tracing::info!(kind = %cmd.kind(), event_id = cmd.event_id(), deleted, "event deleted");
        Ok(deleted)
    }

    /// Ask the backend to plan the day starting at `date`.
    pub async fn generate_smart_daily_plan(
        &self,
        date: DateTime<Utc>,
    ) -> Result<Vec<PlannedEventVo>, ApiError> {
        let request = self.post(SMART_DAILY_PLAN)?.json(&SmartDailyPlanRequest { date });
        self.call(SMART_DAILY_PLAN, request).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}
