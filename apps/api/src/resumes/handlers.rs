use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::{CurrentUser, MaybeUser};
use crate::errors::AppError;
use crate::models::resume::{CreateResumeRequest, Resume, UpdateResumeRequest};
use crate::models::{ApiResponse, MessageResponse};
use crate::resumes::validation::ValidJson;
use crate::state::AppState;

/// Ids that cannot exist are reported like any other missing record.
fn parse_resume_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// GET /resumes
pub async fn handle_list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Resume>>>, AppError> {
    let resumes = state.resumes.list_owned(user_id).await?;
    Ok(Json(ApiResponse::new(resumes)))
}

/// POST /resumes
pub async fn handle_create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ValidJson(req): ValidJson<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Resume>>), AppError> {
    let resume = state.resumes.insert(user_id, req.into()).await?;
    info!("Created resume {} for user {user_id}", resume.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::new(resume))))
}

/// GET /resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Resume>>, AppError> {
    let id = parse_resume_id(&id)?;
    let resume = state
        .resumes
        .find_visible(id, viewer)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::new(resume)))
}

/// PUT /resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateResumeRequest>,
) -> Result<Json<ApiResponse<Resume>>, AppError> {
    let id = parse_resume_id(&id)?;
    let resume = state
        .resumes
        .update_owned(id, user_id, req.into())
        .await?
        .ok_or(AppError::NotFound)?;
    info!("Updated resume {id} for user {user_id}");
    Ok(Json(ApiResponse::new(resume)))
}

/// DELETE /resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_resume_id(&id)?;
    if !state.resumes.delete_owned(id, user_id).await? {
        return Err(AppError::NotFound);
    }
    info!("Deleted resume {id} for user {user_id}");
    Ok(Json(MessageResponse {
        message: "Resume deleted".to_string(),
    }))
}
