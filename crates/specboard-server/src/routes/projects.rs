use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/projects — all registered projects.
pub async fn list_projects(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let list: Vec<serde_json::Value> = app
        .registry
        .projects()
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id,
                "name": p.name,
                "path": p.path,
                "project_type": p.project_type,
                "discovered_at": p.discovered_at,
            })
        })
        .collect();
    Ok(Json(serde_json::json!(list)))
}

/// POST /api/projects/scan — force a rescan of the root directory.
pub async fn scan_projects(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let count = app.registry.scan_root().await?;
    Ok(Json(serde_json::json!({ "projects": count })))
}

/// GET /api/projects/:id — project detail with its feature directories.
pub async fn get_project(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.registry.require(&id)?;

    let path = project.path.clone();
    let features = tokio::task::spawn_blocking(move || {
        specboard_core::specfiles::list_features(&path)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "id": project.id,
        "name": project.name,
        "path": project.path,
        "project_type": project.project_type,
        "discovered_at": project.discovered_at,
        "features": features,
    })))
}
