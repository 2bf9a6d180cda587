use axum::{Json, extract::State, http::StatusCode};

use crate::domain::errors::SheetsError;
use crate::domain::ranking::rank;
use crate::interface_adapters::protocol::{
    AdminUpdateRequest, AdminUpdateResponse, ErrorResponse, HealthResponse, PointsUpdateRequest,
    PointsUpdateResponse, RankingResponse, RegistrationRequest, RegistrationResponse,
    RegistrationsResponse, timestamp,
};
use crate::interface_adapters::extract::{ApiJson, ApiQuery};
use crate::interface_adapters::state::AppState;
use crate::use_cases::form_responses::validate_registration;
use crate::use_cases::participants::DEFAULT_POINTS_DELTA;

pub(crate) type HandlerError = (StatusCode, Json<ErrorResponse>);

// Handler for the public leaderboard.
#[tracing::instrument(name = "ranking", skip_all)]
pub async fn ranking(State(state): State<AppState>) -> Result<Json<RankingResponse>, HandlerError> {
    let participants = state.participants().list().await.map_err(map_sheets_error)?;
    let data = rank(participants);

    tracing::info!(count = data.len(), "ranking served");
    Ok(Json(RankingResponse {
        success: true,
        data,
        timestamp: timestamp(),
    }))
}

// Handler for the admin bulk replace of names and points.
#[tracing::instrument(name = "admin_update", skip_all, fields(count = body.participants.len()))]
pub async fn admin_update(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AdminUpdateRequest>,
) -> Result<Json<AdminUpdateResponse>, HandlerError> {
    let updated_count = state
        .participants()
        .replace_all(body.participants)
        .await
        .map_err(map_sheets_error)?;

    Ok(Json(AdminUpdateResponse {
        success: true,
        message: format!("Successfully updated {updated_count} participants"),
        updated_count,
        timestamp: timestamp(),
    }))
}

// Handler for the public registration form.
#[tracing::instrument(name = "register", skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegistrationRequest>,
) -> Result<Json<RegistrationResponse>, HandlerError> {
    // Validate before anything reaches the sheet.
    let registration = validate_registration(
        &body.name,
        body.attending_dinner.as_deref(),
        body.allergies.as_deref(),
        &body.drink_preferences,
    )
    .map_err(map_sheets_error)?;

    let row = state
        .form_responses()
        .upsert(&registration)
        .await
        .map_err(map_sheets_error)?;

    tracing::info!(row, "registration saved");
    Ok(Json(RegistrationResponse {
        success: true,
        message: format!("Registration saved for {}", registration.name),
        data: registration,
        timestamp: timestamp(),
    }))
}

// Handler listing every stored registration.
#[tracing::instrument(name = "registrations", skip_all)]
pub async fn registrations(
    State(state): State<AppState>,
) -> Result<Json<RegistrationsResponse>, HandlerError> {
    let data = state
        .form_responses()
        .list_all()
        .await
        .map_err(map_sheets_error)?;

    Ok(Json(RegistrationsResponse {
        success: true,
        count: data.len(),
        data,
        timestamp: timestamp(),
    }))
}

// Handler for points awarded via POST body.
pub async fn add_points(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PointsUpdateRequest>,
) -> Result<Json<PointsUpdateResponse>, HandlerError> {
    apply_points(&state, &body).await.map(Json)
}

// Handler for points awarded via GET query, as used by scanned links.
pub async fn add_points_from_link(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PointsUpdateRequest>,
) -> Result<Json<PointsUpdateResponse>, HandlerError> {
    apply_points(&state, &query).await.map(Json)
}

#[tracing::instrument(
    name = "add_points",
    skip_all,
    fields(participant = ?request.participant(), points = ?request.points)
)]
async fn apply_points(
    state: &AppState,
    request: &PointsUpdateRequest,
) -> Result<PointsUpdateResponse, HandlerError> {
    let participant = request.participant().ok_or_else(|| {
        map_sheets_error(SheetsError::validation("missing participant id"))
    })?;
    let points = request.points.unwrap_or(DEFAULT_POINTS_DELTA);

    let updated = state
        .participants()
        .increment_points(participant, points)
        .await
        .map_err(map_sheets_error)?;

    Ok(PointsUpdateResponse {
        success: true,
        message: format!("Successfully added {points} points to {participant}"),
        participant: participant.to_string(),
        points_added: points,
        total_points: updated.points,
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// Helper to build a JSON error response.
pub(crate) fn error_response(status: StatusCode, message: String) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message,
            timestamp: timestamp(),
        }),
    )
}

// Maps domain errors to HTTP responses; upstream detail stays in the message.
fn map_sheets_error(err: SheetsError) -> HandlerError {
    let status = match &err {
        SheetsError::Validation(_) => StatusCode::BAD_REQUEST,
        SheetsError::NotFound(_) => StatusCode::NOT_FOUND,
        SheetsError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SheetsError::UpstreamRead { .. }
        | SheetsError::UpstreamAuth { .. }
        | SheetsError::UpstreamWrite { .. }
        | SheetsError::Transport(_)
        | SheetsError::Decode(_) => StatusCode::BAD_GATEWAY,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::warn!(error = %err, "request rejected");
    }
    error_response(status, err.to_string())
}
