use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/projects/:id/agents — agent definition files with frontmatter
/// metadata.
pub async fn list_agents(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.registry.require(&id)?;

    let path = project.path.clone();
    let agents = tokio::task::spawn_blocking(move || {
        specboard_core::agents::list_agents(&path)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(agents)))
}
