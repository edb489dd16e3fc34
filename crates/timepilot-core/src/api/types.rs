//! Wire types for the TimePilot backend.
//!
//! Field names follow the backend's JSON (camelCase for event payloads,
//! snake_case for the auth token fields). Instants travel as RFC 3339.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::event::{CreateEvent, EventItem, EventKind, Quadrant, UpdateEvent};

/// The backend reports `code` as `"200"` in envelopes and as `200` in auth
/// responses; accept either.
fn code_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("unexpected response code {other}"))),
    }
}

const SUCCESS_CODE: &str = "200";

/// `{ code, info, data }` envelope used by every event endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseResponse<T> {
    #[serde(deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(rename = "info")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> BaseResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Unwrap the payload, turning refusals and empty successes into errors.
    pub fn into_data(self, endpoint: &str) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(ApiError::Rejected {
                endpoint: endpoint.to_string(),
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }
        self.data.ok_or_else(|| ApiError::MissingData {
            endpoint: endpoint.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl LoginResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Refresh responses carry the same fields as a login.
pub type RefreshTokenResponse = LoginResponse;

#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub verification_code: String,
    pub register_type: String,
}

impl RegisterRequest {
    /// Validate the registration form before anything is sent.
    pub fn new(
        username: &str,
        email: &str,
        verification_code: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("username", username),
            ("email", email),
            ("verification_code", verification_code),
            ("password", password),
            ("confirm_password", confirm_password),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::Blank(field.into()));
            }
        }
        if password != confirm_password {
            return Err(ValidationError::InvalidValue {
                field: "confirm_password".into(),
                message: "passwords do not match".into(),
            });
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            verification_code: verification_code.to_string(),
            register_type: "EMAIL".into(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl RegisterResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailCodeResponse {
    #[serde(deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub data: Option<bool>,
}

impl EmailCodeResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitualEventVo {
    pub event_id: i64,
    pub title: String,
    pub quadrant: Quadrant,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<HabitualEventVo> for EventItem {
    fn from(vo: HabitualEventVo) -> Self {
        EventItem {
            event_id: Some(vo.event_id),
            title: vo.title,
            quadrant: vo.quadrant,
            start_time: vo.start_time,
            end_time: vo.end_time,
            kind: EventKind::Habitual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdHocEventVo {
    pub event_id: i64,
    pub title: String,
    pub quadrant: Quadrant,
    pub planned_start_time: DateTime<Utc>,
    pub planned_end_time: DateTime<Utc>,
}

impl From<AdHocEventVo> for EventItem {
    fn from(vo: AdHocEventVo) -> Self {
        EventItem {
            event_id: Some(vo.event_id),
            title: vo.title,
            quadrant: vo.quadrant,
            start_time: vo.planned_start_time,
            end_time: vo.planned_end_time,
            kind: EventKind::AdHoc,
        }
    }
}

/// One entry of a generated daily plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedEventVo {
    pub event_id: Option<i64>,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub quadrant: Option<Quadrant>,
}

impl From<PlannedEventVo> for EventItem {
    fn from(vo: PlannedEventVo) -> Self {
        let kind = vo.kind.parse().unwrap_or_else(|_| {
            tracing::warn!(kind = %vo.kind, "unknown planned event type, treating as ad-hoc");
            EventKind::AdHoc
        });
        EventItem {
            event_id: vo.event_id,
            title: vo.title,
            quadrant: vo.quadrant.unwrap_or_default(),
            start_time: vo.start_time,
            end_time: vo.end_time,
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SmartDailyPlanRequest {
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventBody {
    pub event_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitualEventBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub quadrant: Quadrant,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdHocEventBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    pub title: &'a str,
    pub quadrant: Quadrant,
    pub planned_start_time: DateTime<Utc>,
    pub planned_end_time: DateTime<Utc>,
}

/// Create/update payload in the shape the kind's endpoint expects.
///
/// The backend also reads the kind from a `type` field in the body.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum EventBody<'a> {
    #[serde(rename = "habitual")]
    Habitual(HabitualEventBody<'a>),
    #[serde(rename = "adHoc")]
    AdHoc(AdHocEventBody<'a>),
}

impl<'a> EventBody<'a> {
    pub fn create(cmd: &'a CreateEvent) -> Self {
        match cmd {
            CreateEvent::Habitual(draft) => EventBody::Habitual(HabitualEventBody {
                event_id: None,
                title: &draft.title,
                description: None,
                quadrant: draft.quadrant,
                start_time: draft.start_time,
                end_time: draft.end_time,
            }),
            CreateEvent::AdHoc(draft) => EventBody::AdHoc(AdHocEventBody {
                event_id: None,
                title: &draft.title,
                quadrant: draft.quadrant,
                planned_start_time: draft.start_time,
                planned_end_time: draft.end_time,
            }),
        }
    }

    pub fn update(cmd: &'a UpdateEvent) -> Self {
        match cmd {
            UpdateEvent::Habitual {
                event_id,
                draft,
                description,
            } => EventBody::Habitual(HabitualEventBody {
                event_id: Some(*event_id),
                title: &draft.title,
                description: description.as_deref(),
                quadrant: draft.quadrant,
                start_time: draft.start_time,
                end_time: draft.end_time,
            }),
            UpdateEvent::AdHoc { event_id, draft } => EventBody::AdHoc(AdHocEventBody {
                event_id: Some(*event_id),
                title: &draft.title,
                quadrant: draft.quadrant,
                planned_start_time: draft.start_time,
                planned_end_time: draft.end_time,
            }),
        }
    }
}
