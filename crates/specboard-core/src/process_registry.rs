//! Persistent multi-process registry file.
//!
//! A JSON map (project id → owning process) lets several dashboard
//! processes coordinate over which projects they serve. Reads tolerate a
//! missing, empty, or corrupted file; writes are atomic so a kill mid-write
//! cannot corrupt the registry.

use crate::error::{Result, SpecboardError};
use crate::io;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const REGISTRY_FILE: &str = "registry.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub path: PathBuf,
    pub pid: u32,
    pub registered_at: DateTime<Utc>,
}

impl RegistryEntry {
    pub fn for_current_process(path: PathBuf) -> Self {
        Self {
            path,
            pid: std::process::id(),
            registered_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Liveness
// ---------------------------------------------------------------------------

/// Zero-signal probe: true if a process with this pid exists. Any failure
/// to determine liveness counts as "not alive" so stale entries get
/// cleaned up rather than accumulating.
#[cfg(unix)]
pub fn process_alive(pid: u32) -> bool {
    if pid == 0 {
        return false;
    }
    unsafe { libc::kill(pid as i32, 0) == 0 }
}

#[cfg(not(unix))]
pub fn process_alive(_pid: u32) -> bool {
    false
}

// ---------------------------------------------------------------------------
// ProcessRegistry
// ---------------------------------------------------------------------------

pub struct ProcessRegistry {
    file: PathBuf,
}

impl ProcessRegistry {
    pub fn new(file: PathBuf) -> Self {
        Self { file }
    }

    /// Default location: `~/.specboard/registry.json`.
    pub fn default_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or(SpecboardError::HomeNotFound)?;
        Ok(home.join(".specboard").join(REGISTRY_FILE))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Read the registry. A missing or empty file yields an empty map; a
    /// corrupted file is moved to a timestamped backup and also yields an
    /// empty map — this must never fail startup.
    pub fn load(&self) -> Result<HashMap<String, RegistryEntry>> {
        if !self.file.exists() {
            return Ok(HashMap::new());
        }
        let data = std::fs::read_to_string(&self.file)?;
        if data.trim().is_empty() {
            return Ok(HashMap::new());
        }
        match serde_json::from_str(&data) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let backup = io::backup_corrupt(&self.file)?;
                tracing::warn!(
                    file = %self.file.display(),
                    backup = %backup.display(),
                    error = %e,
                    "registry file corrupted, starting fresh"
                );
                Ok(HashMap::new())
            }
        }
    }

    fn save(&self, entries: &HashMap<String, RegistryEntry>) -> Result<()> {
        let data = serde_json::to_vec_pretty(entries)?;
        io::atomic_write(&self.file, &data)
    }

    pub fn register(&self, id: &str, entry: RegistryEntry) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(id.to_string(), entry);
        self.save(&entries)
    }

    pub fn unregister(&self, id: &str) -> Result<Option<RegistryEntry>> {
        let mut entries = self.load()?;
        let removed = entries.remove(id);
        if removed.is_some() {
            self.save(&entries)?;
        }
        Ok(removed)
    }

    /// Remove entries whose owning process is no longer alive. Returns the
    /// ids that were dropped.
    pub fn cleanup_stale(&self) -> Result<Vec<String>> {
        let mut entries = self.load()?;
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| !process_alive(entry.pid))
            .map(|(id, _)| id.clone())
            .collect();
        if !stale.is_empty() {
            for id in &stale {
                entries.remove(id);
            }
            self.save(&entries)?;
        }
        Ok(stale)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry(dir: &TempDir) -> ProcessRegistry {
        ProcessRegistry::new(dir.path().join(REGISTRY_FILE))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(registry(&dir).load().unwrap().is_empty());
    }

    #[test]
    fn empty_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(REGISTRY_FILE), "").unwrap();
        assert!(registry(&dir).load().unwrap().is_empty());
    }

    #[test]
    fn register_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir);
        reg.register(
            "abc123",
            RegistryEntry::for_current_process(PathBuf::from("/projects/alpha")),
        )
        .unwrap();

        let entries = reg.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["abc123"].path, PathBuf::from("/projects/alpha"));
        assert_eq!(entries["abc123"].pid, std::process::id());
    }

    #[test]
    fn corrupted_file_is_backed_up_and_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(REGISTRY_FILE), "{not json!").unwrap();

        let entries = registry(&dir).load().unwrap();
        assert!(entries.is_empty());

        // Original renamed aside, nothing left at the registry path.
        assert!(!dir.path().join(REGISTRY_FILE).exists());
        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("registry.json.corrupt-")
            })
            .collect();
        assert_eq!(backups.len(), 1);
    }

    #[test]
    fn unregister_removes_entry() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir);
        reg.register(
            "abc123",
            RegistryEntry::for_current_process(PathBuf::from("/p")),
        )
        .unwrap();

        let removed = reg.unregister("abc123").unwrap();
        assert!(removed.is_some());
        assert!(reg.load().unwrap().is_empty());
        assert!(reg.unregister("abc123").unwrap().is_none());
    }

    #[test]
    fn cleanup_drops_dead_pids_and_keeps_live_ones() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir);
        reg.register(
            "live",
            RegistryEntry::for_current_process(PathBuf::from("/live")),
        )
        .unwrap();
        reg.register(
            "dead",
            RegistryEntry {
                path: PathBuf::from("/dead"),
                // Way past pid_max on any reasonable system.
                pid: 999_999_999,
                registered_at: Utc::now(),
            },
        )
        .unwrap();

        let stale = reg.cleanup_stale().unwrap();
        assert_eq!(stale, vec!["dead".to_string()]);

        let entries = reg.load().unwrap();
        assert!(entries.contains_key("live"));
        assert!(!entries.contains_key("dead"));
    }

    #[test]
    fn current_process_is_alive() {
        assert!(process_alive(std::process::id()));
    }
}
