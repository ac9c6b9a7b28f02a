use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::template::TemplateCatalog;
use crate::models::ApiResponse;
use crate::state::AppState;

/// GET /templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TemplateCatalog>>, AppError> {
    let templates = state.templates.list().await?;
    Ok(Json(ApiResponse::new(TemplateCatalog::from_templates(templates))))
}
