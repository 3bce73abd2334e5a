//! GitHub CLI queries.
//!
//! The hook never talks to the GitHub API directly; everything goes through
//! the `gh` binary. The [`GhClient`] trait keeps that surface narrow so the
//! checking logic can be exercised with a fake in tests.

use crate::subprocess::{gh, is_installed};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// A status check reported as failed on a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailingCheck {
    pub context: String,
    pub description: String,
}

/// The slice of the GitHub CLI's command surface this hook consumes.
pub trait GhClient {
    /// Is the CLI discoverable on PATH?
    fn tool_available(&self) -> bool;

    /// Does the CLI report an authenticated session?
    fn authenticated(&self) -> bool;

    /// Number of the most recent PR whose head branch matches, if any.
    fn find_pr_by_branch(&self, branch: &str) -> Result<Option<u64>>;

    /// Status checks of the PR that are in FAILURE state.
    fn failing_checks(&self, number: u64) -> Result<Vec<FailingCheck>>;
}

/// Real implementation shelling out to `gh`.
pub struct GhCli;

#[derive(Debug, Deserialize)]
struct PrNumber {
    number: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrStatusView {
    #[serde(default)]
    status_check_rollup: Option<Vec<RollupEntry>>,
}

#[derive(Debug, Default, Deserialize)]
struct RollupEntry {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl GhClient for GhCli {
    fn tool_available(&self) -> bool {
        is_installed("gh")
    }

    fn authenticated(&self) -> bool {
        gh("auth status").map(|r| r.success).unwrap_or(false)
    }

    fn find_pr_by_branch(&self, branch: &str) -> Result<Option<u64>> {
        let result = gh(&format!("pr list --head {} --json number", branch))?;
        if !result.success {
            bail!("gh pr list failed: {}", result.stderr);
        }

        let prs: Vec<PrNumber> = serde_json::from_str(&result.stdout)
            .context("Failed to parse gh pr list output")?;
        Ok(prs.first().map(|pr| pr.number))
    }

    fn failing_checks(&self, number: u64) -> Result<Vec<FailingCheck>> {
        let result = gh(&format!("pr view {} --json statusCheckRollup", number))?;
        if !result.success {
            bail!("gh pr view failed: {}", result.stderr);
        }

        let view: PrStatusView = serde_json::from_str(&result.stdout)
            .context("Failed to parse gh pr view output")?;

        let failing = view
            .status_check_rollup
            .unwrap_or_default()
            .into_iter()
            .filter(|entry| entry.state.as_deref() == Some("FAILURE"))
            .map(|entry| FailingCheck {
                context: entry.context.unwrap_or_default(),
                description: entry.description.unwrap_or_default(),
            })
            .collect();
        Ok(failing)
    }
}
