use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct PutFileBody {
    pub content: String,
}

/// GET /api/projects/:id/features/:feature/files/:filename — read an
/// allow-listed spec file.
pub async fn get_spec_file(
    State(app): State<AppState>,
    Path((id, feature, filename)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.registry.require(&id)?;

    let path = project.path.clone();
    let result = tokio::task::spawn_blocking(move || {
        let content = specboard_core::specfiles::read_spec_file(&path, &feature, &filename)?;
        Ok::<_, specboard_core::SpecboardError>(serde_json::json!({
            "feature": feature,
            "filename": filename,
            "content": content,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// PUT /api/projects/:id/features/:feature/files/:filename — overwrite an
/// allow-listed spec file.
pub async fn put_spec_file(
    State(app): State<AppState>,
    Path((id, feature, filename)): Path<(String, String, String)>,
    Json(body): Json<PutFileBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.registry.require(&id)?;

    let path = project.path.clone();
    let result = tokio::task::spawn_blocking(move || {
        specboard_core::specfiles::write_spec_file(&path, &feature, &filename, &body.content)?;
        Ok::<_, specboard_core::SpecboardError>(serde_json::json!({
            "feature": feature,
            "filename": filename,
            "bytes": body.content.len(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
