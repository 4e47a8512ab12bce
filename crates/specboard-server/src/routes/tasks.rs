use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/projects/:id/features/:feature/tasks — parsed phases.
pub async fn get_tasks(
    State(app): State<AppState>,
    Path((id, feature)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.registry.require(&id)?;

    let path = project.path.clone();
    let result = tokio::task::spawn_blocking(move || {
        let phases = specboard_core::specfiles::load_tasks(&path, &feature)?;
        Ok::<_, specboard_core::SpecboardError>(serde_json::json!({
            "feature": feature,
            "summary": specboard_core::tasks::summarize(&phases),
            "phases": phases,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/projects/:id/features/:feature/tasks/:task_id/toggle —
/// flip a checkbox, persist, and return the refreshed phases.
pub async fn toggle_task(
    State(app): State<AppState>,
    Path((id, feature, task_id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.registry.require(&id)?;

    let path = project.path.clone();
    let result = tokio::task::spawn_blocking(move || {
        let phases = specboard_core::specfiles::toggle_task(&path, &feature, &task_id)?;
        Ok::<_, specboard_core::SpecboardError>(serde_json::json!({
            "feature": feature,
            "task_id": task_id,
            "summary": specboard_core::tasks::summarize(&phases),
            "phases": phases,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
