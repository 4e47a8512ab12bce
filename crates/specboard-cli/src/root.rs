use std::path::{Path, PathBuf};

/// Resolve the projects root directory.
///
/// Priority:
/// 1. `--root` flag / `SPECBOARD_ROOT` env var (passed in as `explicit`)
/// 2. Current working directory
///
/// Unlike a single-project tool there is no marker file to walk upward
/// for — the root is whatever directory holds the projects.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
