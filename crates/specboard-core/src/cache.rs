//! Classification caches for project-type probes.
//!
//! Two independent policies: a positive cache validated against the
//! directory's mtime, and a negative cache with a fixed TTL so directories
//! that probed as "not a project" aren't re-read on every scan.

use crate::project::ProjectType;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Negative results ("not a project") are suppressed for this long,
/// regardless of mtime changes.
pub fn negative_ttl() -> Duration {
    Duration::minutes(5)
}

/// Positive entries older than this (wall clock, not mtime) are dropped at
/// scan start. Coarser safety valve than the mtime check.
pub fn positive_max_age() -> Duration {
    Duration::hours(1)
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Injectable time source so tests can drive TTL expiry without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ---------------------------------------------------------------------------
// ClassificationCache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct PositiveEntry {
    project_type: ProjectType,
    dir_mtime: SystemTime,
    cached_at: DateTime<Utc>,
}

/// Outcome of a cache lookup before probing a directory.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheDecision {
    /// A valid positive entry exists; reuse the stored classification.
    Hit(ProjectType),
    /// The path is inside its negative-cache window; skip probing entirely.
    SkipNegative,
    /// No usable entry; the caller must probe.
    Miss,
}

#[derive(Default)]
pub struct ClassificationCache {
    positive: HashMap<PathBuf, PositiveEntry>,
    negative: HashMap<PathBuf, DateTime<Utc>>,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult both caches for `path` given the directory's current mtime.
    ///
    /// A positive entry is valid while its stored timestamp is newer than or
    /// equal to the current mtime. The negative window applies even when the
    /// mtime changed — a fixed-TTL policy, not an mtime one.
    pub fn lookup(&self, path: &Path, current_mtime: SystemTime, now: DateTime<Utc>) -> CacheDecision {
        if let Some(cached_at) = self.negative.get(path) {
            if now.signed_duration_since(*cached_at) < negative_ttl() {
                return CacheDecision::SkipNegative;
            }
        }
        if let Some(entry) = self.positive.get(path) {
            if entry.dir_mtime >= current_mtime {
                return CacheDecision::Hit(entry.project_type);
            }
        }
        CacheDecision::Miss
    }

    pub fn store_positive(
        &mut self,
        path: PathBuf,
        project_type: ProjectType,
        dir_mtime: SystemTime,
        now: DateTime<Utc>,
    ) {
        self.negative.remove(&path);
        self.positive.insert(
            path,
            PositiveEntry {
                project_type,
                dir_mtime,
                cached_at: now,
            },
        );
    }

    pub fn store_negative(&mut self, path: PathBuf, now: DateTime<Utc>) {
        self.positive.remove(&path);
        self.negative.insert(path, now);
    }

    /// Forget a path entirely. Used when the watcher sees the directory
    /// appear or disappear, so the next scan re-probes it.
    pub fn invalidate(&mut self, path: &Path) {
        self.positive.remove(path);
        self.negative.remove(path);
    }

    /// Drop expired negative entries and positive entries older than
    /// [`positive_max_age`]. Called at the start of each scan.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) {
        self.negative
            .retain(|_, cached_at| now.signed_duration_since(*cached_at) < negative_ttl());
        self.positive
            .retain(|_, entry| now.signed_duration_since(entry.cached_at) < positive_max_age());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
