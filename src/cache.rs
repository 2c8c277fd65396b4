//! Grading result caching for directory runs
//!
//! Caches reports by file content hash so unchanged pages are not
//! re-graded. The whole cache is invalidated when the config fingerprint
//! changes, since weights and thresholds feed into every report.

use crate::config::Config;
use crate::GradeReport;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const CACHE_VERSION: u32 = 1;
const CACHE_FILENAME: &str = ".gridmark-cache.json";

/// Cache entry for a single page
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// SHA256 hash of the page content
    content_hash: String,
    /// Cached grading report
    report: GradeReport,
    /// Timestamp when cached
    cached_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheData {
    /// Cache format version
    version: u32,
    /// Fingerprint of the config the entries were graded with
    config_fingerprint: String,
    /// Map of file path to cache entry
    entries: HashMap<String, CacheEntry>,
}

impl CacheData {
    fn empty(config_fingerprint: String) -> Self {
        Self {
            version: CACHE_VERSION,
            config_fingerprint,
            entries: HashMap::new(),
        }
    }
}

/// Cache manager for grading reports
pub struct GradeCache {
    cache_path: PathBuf,
    data: CacheData,
    dirty: bool,
    enabled: bool,
}

impl GradeCache {
    /// Create a cache for a project root. Stale caches (different version
    /// or config fingerprint) are discarded.
    pub fn new(project_root: &Path, config_fingerprint: String) -> Self {
        let cache_path = project_root.join(CACHE_FILENAME);
        let data = Self::load_cache(&cache_path)
            .filter(|d| d.config_fingerprint == config_fingerprint)
            .unwrap_or_else(|| CacheData::empty(config_fingerprint));

        Self {
            cache_path,
            data,
            dirty: false,
            enabled: true,
        }
    }

    /// Create a disabled cache (no-op)
    pub fn disabled() -> Self {
        Self {
            cache_path: PathBuf::new(),
            data: CacheData::empty(String::new()),
            dirty: false,
            enabled: false,
        }
    }

    fn load_cache(path: &Path) -> Option<CacheData> {
        let content = fs::read_to_string(path).ok()?;
        let data: CacheData = serde_json::from_str(&content).ok()?;
        if data.version != CACHE_VERSION {
            return None;
        }
        Some(data)
    }

    /// Save cache to disk
    pub fn save(&self) -> Result<()> {
        if !self.enabled || !self.dirty {
            return Ok(());
        }

        let content =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize cache")?;
        fs::write(&self.cache_path, content)
            .with_context(|| format!("Failed to write cache to {}", self.cache_path.display()))?;

        Ok(())
    }

    /// Compute SHA256 hash of page content
    fn hash_content(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Get a cached report if the page content is unchanged
    pub fn get(&self, page_path: &Path, content: &str) -> Option<GradeReport> {
        if !self.enabled {
            return None;
        }

        let key = page_path.to_string_lossy().to_string();
        let entry = self.data.entries.get(&key)?;
        if entry.content_hash != Self::hash_content(content) {
            return None;
        }
        Some(entry.report.clone())
    }

    /// Store a report for a page
    pub fn insert(&mut self, page_path: &Path, content: &str, report: &GradeReport) {
        if !self.enabled {
            return;
        }

        let key = page_path.to_string_lossy().to_string();
        let cached_at = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.data.entries.insert(
            key,
            CacheEntry {
                content_hash: Self::hash_content(content),
                report: report.clone(),
                cached_at,
            },
        );
        self.dirty = true;
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        if self.data.entries.is_empty() {
            return;
        }
        self.data.entries.clear();
        self.dirty = true;
    }
}

/// Fingerprint of the parts of a config that affect grading output.
/// Serialized through a Value so map keys come out sorted and the
/// fingerprint is stable across runs.
pub fn config_fingerprint(config: &Config) -> String {
    let serialized = serde_json::to_value(config)
        .map(|v| v.to_string())
        .unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    hex::encode(hasher.finalize())
}
