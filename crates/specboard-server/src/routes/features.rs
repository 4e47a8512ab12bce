use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/projects/:id/features — feature directories with their
/// available spec files and a task completion summary.
pub async fn list_features(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.registry.require(&id)?;

    let path = project.path.clone();
    let result = tokio::task::spawn_blocking(move || {
        let features = specboard_core::specfiles::list_features(&path)?;
        let list: Vec<serde_json::Value> = features
            .iter()
            .map(|feature| {
                let files = specboard_core::specfiles::list_feature_files(&path, feature)
                    .unwrap_or_default();
                let tasks = specboard_core::specfiles::load_tasks(&path, feature).ok();
                serde_json::json!({
                    "name": feature,
                    "files": files,
                    "task_summary": tasks.as_deref().map(specboard_core::tasks::summarize),
                })
            })
            .collect();
        Ok::<_, specboard_core::SpecboardError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
