//! In-memory project registry: scans a root directory, classifies its
//! immediate children through the cache/probe layers, and fans out
//! discovery/removal events on a broadcast channel.
//!
//! Maps are locked only for individual lookups and inserts, never across an
//! await, so a scan in progress is observable as a partial state. Callers
//! must tolerate that; both the watcher and the periodic scan converge to
//! the same classification.

use crate::cache::{CacheDecision, ClassificationCache, Clock, SystemClock};
use crate::classify::{probe_error_kind, FsProbe, ProbeErrorKind, ProjectProbe};
use crate::error::{Result, SpecboardError};
use crate::project::{Project, ProjectType};
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, Semaphore};

/// At most this many filesystem probes run at once during a scan.
pub const MAX_CONCURRENT_PROBES: usize = 10;

/// A probe that exceeds this budget releases its slot and is retried on the
/// next scan.
pub fn probe_timeout() -> Duration {
    Duration::from_secs(10)
}

// ---------------------------------------------------------------------------
// RegistryEvent
// ---------------------------------------------------------------------------

/// Registry change notification, serialized as a tagged union on `type`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    ProjectDiscovered {
        id: String,
        name: String,
        path: PathBuf,
        project_type: ProjectType,
    },
    ProjectUpdated {
        id: String,
        name: String,
        path: PathBuf,
        project_type: ProjectType,
    },
    ProjectRemoved {
        id: String,
        path: PathBuf,
    },
}

impl RegistryEvent {
    /// Stable tag, used as the SSE event name.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryEvent::ProjectDiscovered { .. } => "project_discovered",
            RegistryEvent::ProjectUpdated { .. } => "project_updated",
            RegistryEvent::ProjectRemoved { .. } => "project_removed",
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectRegistry
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Inner {
    projects: HashMap<String, Project>,
    cache: ClassificationCache,
}

pub struct ProjectRegistry {
    root: PathBuf,
    inner: Mutex<Inner>,
    probe: Arc<dyn ProjectProbe>,
    clock: Arc<dyn Clock>,
    limiter: Arc<Semaphore>,
    event_tx: broadcast::Sender<RegistryEvent>,
}

impl ProjectRegistry {
    pub fn new(root: PathBuf) -> Self {
        Self::with_parts(root, Arc::new(FsProbe), Arc::new(SystemClock))
    }

    /// Test seam: inject the probe and clock.
    pub fn with_parts(root: PathBuf, probe: Arc<dyn ProjectProbe>, clock: Arc<dyn Clock>) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            root,
            inner: Mutex::new(Inner::default()),
            probe,
            clock,
            limiter: Arc::new(Semaphore::new(MAX_CONCURRENT_PROBES)),
            event_tx,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("registry lock poisoned")
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.event_tx.subscribe()
    }

    /// Snapshot of all registered projects, name order.
    pub fn projects(&self) -> Vec<Project> {
        let inner = self.locked();
        let mut list: Vec<Project> = inner.projects.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn get(&self, id: &str) -> Option<Project> {
        let inner = self.locked();
        inner.projects.get(id).cloned()
    }

    /// Look up a project or fail with `ProjectNotFound`.
    pub fn require(&self, id: &str) -> Result<Project> {
        self.get(id)
            .ok_or_else(|| SpecboardError::ProjectNotFound(id.to_string()))
    }

    // -----------------------------------------------------------------------
    // Scanning
    // -----------------------------------------------------------------------

    /// Enumerate immediate subdirectories of the root, classify each through
    /// the caches, and reconcile the in-memory map. Returns the number of
    /// registered projects after the scan.
    pub async fn scan_root(&self) -> Result<usize> {
        let now = self.clock.now();
        {
            let mut inner = self.locked();
            inner.cache.purge_expired(now);
        }

        let mut read_dir = match tokio::fs::read_dir(&self.root).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SpecboardError::RootNotFound(
                    self.root.display().to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let mut dirs = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                dirs.push(entry.path());
            }
        }

        let mut probes = FuturesUnordered::new();
        for dir in &dirs {
            probes.push(self.classify_path(dir.clone()));
        }
        // Completion order is unspecified; results land in the map as they
        // finish.
        while probes.next().await.is_some() {}

        self.remove_vanished(&dirs);

        let inner = self.locked();
        Ok(inner.projects.len())
    }

    /// Classify one path (cache-aware, probe bounded by the scan limiter)
    /// and reconcile the registry entry for it.
    pub async fn classify_path(&self, path: PathBuf) {
        let now = self.clock.now();

        let mtime = match self.probe.dir_mtime(&path).await {
            Ok(mtime) => mtime,
            Err(e) => {
                self.handle_probe_error(&path, &e, now);
                return;
            }
        };

        let decision = {
            let inner = self.locked();
            inner.cache.lookup(&path, mtime, now)
        };

        match decision {
            CacheDecision::SkipNegative => {}
            CacheDecision::Hit(project_type) => self.apply_positive(&path, project_type),
            CacheDecision::Miss => {
                let _permit = self
                    .limiter
                    .acquire()
                    .await
                    .expect("probe limiter closed");
                match tokio::time::timeout(probe_timeout(), self.probe.classify(&path)).await {
                    Ok(Ok(Some(project_type))) => {
                        let now = self.clock.now();
                        {
                            let mut inner = self.locked();
                            inner
                                .cache
                                .store_positive(path.clone(), project_type, mtime, now);
                        }
                        self.apply_positive(&path, project_type);
                    }
                    Ok(Ok(None)) => {
                        let now = self.clock.now();
                        {
                            let mut inner = self.locked();
                            inner.cache.store_negative(path.clone(), now);
                        }
                        self.remove_registered(&path);
                    }
                    Ok(Err(e)) => self.handle_probe_error(&path, &e, self.clock.now()),
                    Err(_elapsed) => {
                        // Treated like an unexpected error: negative for this
                        // scan, not negative-cached, retried next scan.
                        tracing::warn!(path = %path.display(), "project probe timed out");
                    }
                }
            }
        }
    }

    fn apply_positive(&self, path: &Path, project_type: ProjectType) {
        let now = self.clock.now();
        let event = {
            let mut inner = self.locked();
            let project = Project::new(path.to_path_buf(), project_type, now);
            match inner.projects.get_mut(&project.id) {
                None => {
                    let event = RegistryEvent::ProjectDiscovered {
                        id: project.id.clone(),
                        name: project.name.clone(),
                        path: project.path.clone(),
                        project_type,
                    };
                    inner.projects.insert(project.id.clone(), project);
                    Some(event)
                }
                Some(existing) if existing.project_type != project_type => {
                    existing.project_type = project_type;
                    Some(RegistryEvent::ProjectUpdated {
                        id: existing.id.clone(),
                        name: existing.name.clone(),
                        path: existing.path.clone(),
                        project_type,
                    })
                }
                Some(_) => None,
            }
        };
        if let Some(event) = event {
            let _ = self.event_tx.send(event);
        }
    }

    fn handle_probe_error(&self, path: &Path, err: &std::io::Error, now: DateTime<Utc>) {
        match probe_error_kind(err) {
            ProbeErrorKind::NotFound => {
                let mut inner = self.locked();
                inner.cache.store_negative(path.to_path_buf(), now);
                drop(inner);
                self.remove_registered(path);
            }
            ProbeErrorKind::PermissionDenied => {
                tracing::warn!(path = %path.display(), "permission denied probing directory");
                let mut inner = self.locked();
                inner.cache.store_negative(path.to_path_buf(), now);
                drop(inner);
                self.remove_registered(path);
            }
            ProbeErrorKind::Other => {
                // Negative for this scan only; no cache entry, so the next
                // scan retries. A registered project survives a transient
                // error.
                tracing::warn!(path = %path.display(), error = %err, "probe failed");
            }
        }
    }

    /// Remove the registry entry for `path` if one exists, emitting
    /// `ProjectRemoved`.
    pub fn remove_registered(&self, path: &Path) -> Option<Project> {
        let removed = {
            let mut inner = self.locked();
            let id = crate::project::project_id(path);
            inner.projects.remove(&id)
        };
        if let Some(project) = &removed {
            let _ = self.event_tx.send(RegistryEvent::ProjectRemoved {
                id: project.id.clone(),
                path: project.path.clone(),
            });
        }
        removed
    }

    /// Drop registered projects directly under the root that the directory
    /// listing no longer contains (deleted between scans, without a watcher
    /// event).
    fn remove_vanished(&self, listed: &[PathBuf]) {
        let stale: Vec<PathBuf> = {
            let inner = self.locked();
            inner
                .projects
                .values()
                .filter(|p| p.path.parent() == Some(self.root.as_path()))
                .filter(|p| !listed.contains(&p.path))
                .map(|p| p.path.clone())
                .collect()
        };
        for path in stale {
            self.remove_registered(&path);
        }
    }

    // -----------------------------------------------------------------------
    // Watcher integration
    // -----------------------------------------------------------------------

    /// A directory appeared under the root: forget any negative-cache entry
    /// so it gets a fresh classification chance, then classify immediately.
    pub async fn note_created(&self, path: PathBuf) {
        {
            let mut inner = self.locked();
            inner.cache.invalidate(&path);
        }
        self.classify_path(path).await;
    }

    /// A directory disappeared from under the root.
    pub fn note_removed(&self, path: &Path) {
        {
            let mut inner = self.locked();
            inner.cache.invalidate(path);
        }
        self.remove_registered(path);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
