use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{FormResponse, ParticipantUpdate, RankedParticipant, Registration};

// RFC 3339 UTC timestamp stamped on every envelope.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub success: bool,
    pub data: Vec<RankedParticipant>,
    pub timestamp: String,
}

// Admin bulk replace. A missing list is rejected as a validation error
// rather than a body-shape error.
#[derive(Debug, Deserialize)]
pub struct AdminUpdateRequest {
    #[serde(default)]
    pub participants: Vec<ParticipantUpdate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateResponse {
    pub success: bool,
    pub message: String,
    pub updated_count: usize,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[serde(default)]
    pub name: String,
    pub attending_dinner: Option<String>,
    pub allergies: Option<String>,
    #[serde(default)]
    pub drink_preferences: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub success: bool,
    pub message: String,
    pub data: Registration,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrationsResponse {
    pub success: bool,
    pub data: Vec<FormResponse>,
    pub count: usize,
    pub timestamp: String,
}

// Points update, accepted as a JSON body or as query parameters.
// `id` is the name the public QR links have always used.
#[derive(Debug, Default, Deserialize)]
pub struct PointsUpdateRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub points: Option<i64>,
}

impl PointsUpdateRequest {
    pub fn participant(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsUpdateResponse {
    pub success: bool,
    pub message: String,
    pub participant: String,
    pub points_added: i64,
    pub total_points: i64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// Failure envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub timestamp: String,
}
