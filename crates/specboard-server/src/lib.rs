pub mod embed;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Projects
        .route("/api/projects", get(routes::projects::list_projects))
        .route("/api/projects/scan", post(routes::projects::scan_projects))
        .route("/api/projects/{id}", get(routes::projects::get_project))
        // Features
        .route(
            "/api/projects/{id}/features",
            get(routes::features::list_features),
        )
        // Tasks
        .route(
            "/api/projects/{id}/features/{feature}/tasks",
            get(routes::tasks::get_tasks),
        )
        .route(
            "/api/projects/{id}/features/{feature}/tasks/{task_id}/toggle",
            post(routes::tasks::toggle_task),
        )
        // Spec files
        .route(
            "/api/projects/{id}/features/{feature}/files/{filename}",
            get(routes::files::get_spec_file),
        )
        .route(
            "/api/projects/{id}/features/{feature}/files/{filename}",
            put(routes::files::put_spec_file),
        )
        // Constitution
        .route(
            "/api/projects/{id}/constitution",
            get(routes::constitution::get_constitution),
        )
        .route(
            "/api/projects/{id}/constitution",
            put(routes::constitution::put_constitution),
        )
        // Agents
        .route("/api/projects/{id}/agents", get(routes::agents::list_agents))
        .fallback(embed::static_handler)
        .layer(cors)
        .with_state(app_state)
}

/// Start the dashboard server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the dashboard server on a pre-bound listener.
///
/// Accepting a `TcpListener` lets the caller read the actual port before
/// starting (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();

    register_process(&root);
    spawn_registry_cleanup();

    let app = build_router(root);

    tracing::info!("specboard listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

/// Record this process in the shared on-disk registry and drop entries for
/// processes that no longer exist. Failures are logged, never fatal.
fn register_process(root: &std::path::Path) {
    use specboard_core::process_registry::{ProcessRegistry, RegistryEntry};

    let registry = match ProcessRegistry::open_default() {
        Ok(registry) => registry,
        Err(e) => {
            tracing::warn!(error = %e, "process registry unavailable");
            return;
        }
    };
    if let Ok(stale) = registry.cleanup_stale() {
        if !stale.is_empty() {
            tracing::info!(count = stale.len(), "cleaned up stale registry entries");
        }
    }
    let id = specboard_core::project::project_id(root);
    let entry = RegistryEntry::for_current_process(root.to_path_buf());
    if let Err(e) = registry.register(&id, entry) {
        tracing::warn!(error = %e, "failed to record process registration");
    }
}

/// Periodically drop registry entries whose owning process died without
/// unregistering.
fn spawn_registry_cleanup() {
    use specboard_core::process_registry::ProcessRegistry;

    tokio::spawn(async {
        loop {
            tokio::time::sleep(std::time::Duration::from_secs(600)).await;
            if let Ok(registry) = ProcessRegistry::open_default() {
                if let Err(e) = registry.cleanup_stale() {
                    tracing::warn!(error = %e, "process registry cleanup failed");
                }
            }
        }
    });
}
