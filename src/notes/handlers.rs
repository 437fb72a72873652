// HTTP handlers for note endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::notes::models::{NoteId, NoteRequest, NoteResponse};
use crate::AppState;

/// Handler for POST /api/notes
/// Creates a note owned by the authenticated user
#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Missing or invalid access token")
    ),
    security(("bearer_auth" = [])),
    tag = "notes"
)]
pub async fn create_note_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(request): ApiJson<NoteRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    request.validate()?;

    let note = state.note_service.create(user.user_id, request).await?;

    Ok((StatusCode::CREATED, Json(NoteResponse::from(note))))
}

/// Handler for GET /api/notes
/// Lists the authenticated user's notes, newest first
#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "Notes of the caller", body = Vec<NoteResponse>),
        (status = 401, description = "Missing or invalid access token")
    ),
    security(("bearer_auth" = [])),
    tag = "notes"
)]
pub async fn list_notes_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = state.note_service.list_for_owner(user.user_id).await?;

    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}

/// Handler for GET /api/notes/{id}
#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 403, description = "Note belongs to another user"),
        (status = 404, description = "Note not found")
    ),
    security(("bearer_auth" = [])),
    tag = "notes"
)]
pub async fn get_note_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<NoteId>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state.note_service.get(user.user_id, id).await?;

    Ok(Json(NoteResponse::from(note)))
}

/// Handler for PUT /api/notes/{id}
/// Replaces title and description of an owned note
#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Note updated", body = NoteResponse),
        (status = 400, description = "Invalid input data"),
        (status = 403, description = "Note belongs to another user"),
        (status = 404, description = "Note not found")
    ),
    security(("bearer_auth" = [])),
    tag = "notes"
)]
pub async fn update_note_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<NoteId>,
    ApiJson(request): ApiJson<NoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    request.validate()?;

    let note = state.note_service.update(user.user_id, id, request).await?;

    Ok(Json(NoteResponse::from(note)))
}

/// Handler for DELETE /api/notes/{id}
#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 403, description = "Note belongs to another user"),
        (status = 404, description = "Note not found")
    ),
    security(("bearer_auth" = [])),
    tag = "notes"
)]
pub async fn delete_note_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<NoteId>,
) -> Result<StatusCode, ApiError> {
    state.note_service.delete(user.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
