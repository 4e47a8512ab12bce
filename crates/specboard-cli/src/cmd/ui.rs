use anyhow::{anyhow, Result};
use specboard_core::process_registry::{process_alive, ProcessRegistry, RegistryEntry};
use specboard_core::project::project_id;
use std::path::Path;

/// Start the web dashboard for the projects root.
pub fn run(root: &Path, port: u16, no_open: bool) -> Result<()> {
    let id = project_id(root);
    let registry = ProcessRegistry::open_default()?;

    // Prune dead instances; refuse to double-serve the same root.
    let _ = registry.cleanup_stale();
    if let Some(existing) = registry.load()?.get(&id) {
        if process_alive(existing.pid) {
            return Err(anyhow!(
                "specboard is already serving {} (PID {})",
                root.display(),
                existing.pid
            ));
        }
    }

    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        let pid = std::process::id();

        registry.register(&id, RegistryEntry::for_current_process(root_buf.clone()))?;

        println!("specboard for {} → http://localhost:{actual_port}  (PID {pid})", root_buf.display());

        let result = tokio::select! {
            res = specboard_server::serve_on(root_buf, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        };

        let _ = registry.unregister(&id);
        result
    })
}
