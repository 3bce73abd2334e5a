//! File-based memoization of branch check results.
//!
//! One file per (repository, branch) key under a shared cache directory.
//! Each file holds exactly `"0"` (pass / no PR) or `"1"` (fail). Entries
//! never expire; clearing the directory is the only invalidation.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;

/// Environment variable overriding the cache directory.
///
/// Priority:
/// 1. PR_CHECK_CACHE_DIR environment variable (if set)
/// 2. `<tmp>/gh_pr_check_cache` (shared default)
pub const CACHE_DIR_ENV: &str = "PR_CHECK_CACHE_DIR";

/// Outcome of a branch status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Checks passed, or the branch has no PR. Merge proceeds.
    Pass,
    /// At least one failing check. Merge is aborted.
    Fail,
}

impl CheckStatus {
    /// Process exit code for this outcome.
    pub fn code(self) -> u8 {
        match self {
            Self::Pass => 0,
            Self::Fail => 1,
        }
    }

    fn cache_value(self) -> &'static str {
        match self {
            Self::Pass => "0",
            Self::Fail => "1",
        }
    }

    fn from_cache_value(value: &str) -> Option<Self> {
        match value {
            "0" => Some(Self::Pass),
            "1" => Some(Self::Fail),
            _ => None,
        }
    }
}

/// Composite key namespacing cache entries per repository and branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    repo_hash: String,
    branch: String,
}

impl CacheKey {
    /// Build a key from the repository top-level path and a branch name.
    pub fn new(repo_path: &str, branch: &str) -> Self {
        let repo_hash = format!("{:x}", Sha256::digest(repo_path.as_bytes()));
        Self {
            repo_hash,
            branch: branch.to_string(),
        }
    }

    /// Cache file name for this key. Git Flow branches contain `/`, which
    /// is mapped to `_` so entries stay single path components.
    pub fn file_name(&self) -> String {
        format!("{}_{}.cache", self.repo_hash, self.branch.replace('/', "_"))
    }
}

/// Key-value store for check results.
pub trait StatusCache {
    /// Previously stored status, if any. Unreadable or malformed entries
    /// count as a miss.
    fn get(&self, key: &CacheKey) -> Option<CheckStatus>;

    /// Store a status for the key.
    fn set(&self, key: &CacheKey, status: CheckStatus) -> Result<()>;
}

/// Filesystem-backed cache shared across hook invocations.
#[derive(Debug, Clone)]
pub struct FsCache {
    dir: Utf8PathBuf,
}

impl FsCache {
    /// Create a cache rooted at the given directory.
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The machine-wide shared cache location (see [`CACHE_DIR_ENV`]).
    pub fn shared() -> Self {
        if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
            return Self::new(dir);
        }

        let tmp = Utf8PathBuf::from_path_buf(std::env::temp_dir())
            .unwrap_or_else(|_| Utf8PathBuf::from("/tmp"));
        Self::new(tmp.join("gh_pr_check_cache"))
    }

    fn entry_path(&self, key: &CacheKey) -> Utf8PathBuf {
        self.dir.join(key.file_name())
    }
}

impl StatusCache for FsCache {
    fn get(&self, key: &CacheKey) -> Option<CheckStatus> {
        let content = fs::read_to_string(self.entry_path(key)).ok()?;
        CheckStatus::from_cache_value(content.trim())
    }

    fn set(&self, key: &CacheKey, status: CheckStatus) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory: {}", self.dir))?;

        let path = self.entry_path(key);
        fs::write(&path, status.cache_value())
            .with_context(|| format!("Failed to write cache entry: {}", path))?;
        Ok(())
    }
}

/// In-memory cache for tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RefCell<HashMap<String, CheckStatus>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<CheckStatus> {
        self.entries.borrow().get(&key.file_name()).copied()
    }

    fn set(&self, key: &CacheKey, status: CheckStatus) -> Result<()> {
        self.entries.borrow_mut().insert(key.file_name(), status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fs_cache(dir: &tempfile::TempDir) -> FsCache {
        FsCache::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap())
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempdir().unwrap();
        let cache = fs_cache(&dir);
        let key = CacheKey::new("/home/user/repo", "feature/login");

        assert_eq!(cache.get(&key), None);
        cache.set(&key, CheckStatus::Fail).unwrap();
        assert_eq!(cache.get(&key), Some(CheckStatus::Fail));
    }

    #[test]
    fn test_file_content_is_single_digit() {
        let dir = tempdir().unwrap();
        let cache = fs_cache(&dir);
        let key = CacheKey::new("/home/user/repo", "feature/login");

        cache.set(&key, CheckStatus::Pass).unwrap();
        let content = fs::read_to_string(dir.path().join(key.file_name())).unwrap();
        assert_eq!(content, "0");

        cache.set(&key, CheckStatus::Fail).unwrap();
        let content = fs::read_to_string(dir.path().join(key.file_name())).unwrap();
        assert_eq!(content, "1");
    }

    #[test]
    fn test_garbage_entry_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = fs_cache(&dir);
        let key = CacheKey::new("/home/user/repo", "hotfix/crash");

        fs::write(dir.path().join(key.file_name()), "banana").unwrap();
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn test_different_repos_do_not_collide() {
        let a = CacheKey::new("/home/user/repo-a", "feature/login");
        let b = CacheKey::new("/home/user/repo-b", "feature/login");
        assert_ne!(a.file_name(), b.file_name());
    }

    #[test]
    fn test_branch_slash_is_flattened() {
        let key = CacheKey::new("/home/user/repo", "release/1.2.0");
        assert!(!key.file_name().contains('/'));
        assert!(key.file_name().ends_with("_release_1.2.0.cache"));
    }

    #[test]
    fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        let key = CacheKey::new("/repo", "feature/x");

        assert_eq!(cache.get(&key), None);
        cache.set(&key, CheckStatus::Pass).unwrap();
        assert_eq!(cache.get(&key), Some(CheckStatus::Pass));
    }
}
