//! Call Routes - dashboard REST API
//!
//! HTTP handlers that delegate to CallService.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};

use echolink::{CallFilter, StatusFilter};

use crate::error::ApiError;
use crate::models::{
    CallEntry, CreateCallRequest, CreateCallResponse, ErrorResponse, ListCallsQuery,
    ListCallsResponse, Pagination, RecordingResponse, TranscriptEntryResponse,
};
use crate::AppState;

/// List calls
#[utoipa::path(
    get,
    path = "/api/calls",
    params(ListCallsQuery),
    responses(
        (status = 200, description = "One page of calls", body = ListCallsResponse),
        (status = 400, description = "Malformed query parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Provider error", body = ErrorResponse)
    ),
    tag = "Calls"
)]
pub async fn list_calls(
    State(state): State<AppState>,
    query: Result<Query<ListCallsQuery>, QueryRejection>,
) -> Result<Json<ListCallsResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let filter = CallFilter::new(query.page.unwrap_or(1), query.limit.unwrap_or(10))
        .with_status(query.status.as_deref().and_then(StatusFilter::parse));

    let page = state
        .calls
        .list(&filter)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to fetch calls"))?;

    Ok(Json(ListCallsResponse {
        calls: page.calls.into_iter().map(CallEntry::from).collect(),
        pagination: Pagination {
            page: filter.page,
            limit: filter.limit,
            total: page.total,
        },
    }))
}

/// Place an outbound call
#[utoipa::path(
    post,
    path = "/api/calls",
    request_body = CreateCallRequest,
    responses(
        (status = 200, description = "Call initiated", body = CreateCallResponse),
        (status = 400, description = "Missing required parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Provider error", body = ErrorResponse)
    ),
    tag = "Calls"
)]
pub async fn create_call(
    State(state): State<AppState>,
    payload: Result<Json<CreateCallRequest>, JsonRejection>,
) -> Result<Json<CreateCallResponse>, ApiError> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(e) => {
            tracing::warn!("Unreadable call request: {}", e);
            CreateCallRequest::default()
        }
    };
    let to = payload.to.unwrap_or_default();
    let from = payload.from.unwrap_or_default();
    if to.trim().is_empty() || from.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing required parameters".to_string()));
    }

    let call = state
        .calls
        .place_call(&to, &from)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to make call"))?;

    Ok(Json(CreateCallResponse { call_sid: call.sid }))
}

/// Get a single call
#[utoipa::path(
    get,
    path = "/api/calls/{sid}",
    params(("sid" = String, Path, description = "Call SID")),
    responses(
        (status = 200, description = "Call found", body = CallEntry),
        (status = 404, description = "Call not found", body = ErrorResponse),
        (status = 500, description = "Provider error", body = ErrorResponse)
    ),
    tag = "Calls"
)]
pub async fn get_call(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<CallEntry>, ApiError> {
    let call = state
        .calls
        .get(&sid)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to fetch call"))?;

    Ok(Json(call.into()))
}

/// List a call's recordings
#[utoipa::path(
    get,
    path = "/api/calls/{sid}/recordings",
    params(("sid" = String, Path, description = "Call SID")),
    responses(
        (status = 200, description = "Recordings", body = Vec<RecordingResponse>),
        (status = 500, description = "Provider error", body = ErrorResponse)
    ),
    tag = "Calls"
)]
pub async fn list_recordings(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<Vec<RecordingResponse>>, ApiError> {
    let recordings = state
        .calls
        .recordings(&sid)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to fetch recordings"))?;

    Ok(Json(recordings.into_iter().map(Into::into).collect()))
}

/// Get a call's transcript
#[utoipa::path(
    get,
    path = "/api/calls/{sid}/transcript",
    params(("sid" = String, Path, description = "Call SID")),
    responses(
        (status = 200, description = "Transcript entries in call order", body = Vec<TranscriptEntryResponse>),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "Calls"
)]
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<Vec<TranscriptEntryResponse>>, ApiError> {
    let entries = state
        .calls
        .transcript(&sid)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to fetch transcript"))?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/calls", get(list_calls).post(create_call))
        .route("/api/calls/:sid", get(get_call))
        .route("/api/calls/:sid/recordings", get(list_recordings))
        .route("/api/calls/:sid/transcript", get(get_transcript))
}
