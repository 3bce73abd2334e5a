//! Common utilities for Git hooks.
//!
//! This crate provides shared functionality for the merge guard hooks:
//! - Subprocess execution
//! - Git repository helpers
//! - GitHub CLI queries
//! - Check-result caching

pub mod cache;
pub mod gh;
pub mod git;
pub mod subprocess;

pub use cache::{CacheKey, CheckStatus, FsCache, MemoryCache, StatusCache};
pub use gh::{FailingCheck, GhCli, GhClient};
pub use subprocess::run_command;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{CacheKey, CheckStatus, FsCache, StatusCache};
    pub use crate::gh::{FailingCheck, GhCli, GhClient};
    pub use crate::subprocess::run_command;
    pub use anyhow::{Context, Result};
}
