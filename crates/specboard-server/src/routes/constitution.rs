use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct PutConstitutionBody {
    pub content: String,
}

/// GET /api/projects/:id/constitution.
pub async fn get_constitution(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.registry.require(&id)?;

    let path = project.path.clone();
    let content = tokio::task::spawn_blocking(move || {
        specboard_core::specfiles::read_constitution(&path)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "content": content })))
}

/// PUT /api/projects/:id/constitution.
pub async fn put_constitution(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PutConstitutionBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.registry.require(&id)?;

    let path = project.path.clone();
    let bytes = body.content.len();
    tokio::task::spawn_blocking(move || {
        specboard_core::specfiles::write_constitution(&path, &body.content)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "bytes": bytes })))
}
