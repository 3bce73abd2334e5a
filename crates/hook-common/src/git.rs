//! Git repository helpers.
//!
//! Thin wrappers over `git rev-parse`. Git itself is the source of truth
//! for repository layout; nothing here inspects `.git` internals directly
//! beyond joining paths Git reports.

use crate::subprocess::git;
use anyhow::{bail, Result};
use camino::Utf8PathBuf;

/// Top-level path of the current repository.
pub fn toplevel() -> Result<String> {
    let result = git("rev-parse --show-toplevel")?;
    if !result.success {
        bail!("not inside a git repository: {}", result.stderr);
    }
    Ok(result.stdout)
}

/// The repository's metadata directory, resolved against the working
/// directory (`git rev-parse --git-dir` may return a relative path).
pub fn git_dir() -> Result<Utf8PathBuf> {
    let result = git("rev-parse --git-dir")?;
    if !result.success {
        bail!("not inside a git repository: {}", result.stderr);
    }

    let cwd = std::env::current_dir()?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow::anyhow!("non-UTF8 working directory: {}", p.display()))?;
    Ok(cwd.join(result.stdout))
}

/// Path of the merge-message file Git writes during a merge.
pub fn merge_msg_path() -> Result<Utf8PathBuf> {
    Ok(git_dir()?.join("MERGE_MSG"))
}
