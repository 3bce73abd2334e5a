//! Git Flow merge guard.
//!
//! Blocks a merge when the source branch's PR has failing status checks.
//! Installed as a Git hook: reads `<git-dir>/MERGE_MSG`, and when the merge
//! source is a `hotfix/`, `release/` or `feature/` branch, asks the GitHub
//! CLI whether the branch's PR passed CI. Exit 1 aborts the merge.

use chrono::Local;
use hook_common::git;
use hook_common::prelude::*;
use regex::Regex;
use std::fs;
use std::process::ExitCode;

/// Branch prefixes whose merges are guarded. Everything else passes.
const GUARDED_PREFIXES: [&str; 3] = ["hotfix/", "release/", "feature/"];

fn main() -> ExitCode {
    match run() {
        Ok(CheckStatus::Pass) => ExitCode::SUCCESS,
        Ok(CheckStatus::Fail) => {
            println!("\nマージを中断します。");
            ExitCode::from(1)
        }
        Err(e) => {
            println!("予期せぬエラーが発生しました: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<CheckStatus> {
    // Not inside a repository, or no merge message: nothing to check.
    let Ok(merge_msg_path) = git::merge_msg_path() else {
        return Ok(CheckStatus::Pass);
    };
    if !merge_msg_path.exists() {
        return Ok(CheckStatus::Pass);
    }

    let merge_msg = fs::read_to_string(&merge_msg_path)?;
    let Some(branch) = extract_guarded_branch(&merge_msg) else {
        return Ok(CheckStatus::Pass);
    };

    println!(
        "GitHub PR Checker を開始します... {}",
        Local::now().format("%Y-%m-%dT%H:%M:%S")
    );

    let repo_path = git::toplevel()?;
    let key = CacheKey::new(&repo_path, &branch);

    Ok(check_branch_status(&branch, &key, &GhCli, &FsCache::shared()))
}

/// Extract the merge source branch when it carries a guarded prefix.
///
/// Matches the `Merge branch '<name>'` form Git writes into MERGE_MSG.
/// Unguarded branches and unrelated messages yield `None`.
fn extract_guarded_branch(merge_msg: &str) -> Option<String> {
    let pattern = Regex::new(r"Merge\s+branch\s+'([^']+)'").unwrap();
    let branch = pattern.captures(merge_msg)?.get(1)?.as_str();

    GUARDED_PREFIXES
        .iter()
        .any(|prefix| branch.starts_with(prefix))
        .then(|| branch.to_string())
}

/// Determine whether the branch's PR allows the merge.
///
/// A cached result short-circuits everything, including the tool and auth
/// probes. Tool/auth failures and `gh` command errors return Fail without
/// caching; only a final pass/fail determination is written back.
fn check_branch_status(
    branch: &str,
    key: &CacheKey,
    gh: &impl GhClient,
    cache: &impl StatusCache,
) -> CheckStatus {
    if let Some(status) = cache.get(key) {
        println!("キャッシュされた結果を使用します: {}", status.code());
        return status;
    }

    if !gh.tool_available() {
        println!("エラー: GitHub CLI (gh) がインストールされていません");
        return CheckStatus::Fail;
    }
    if !gh.authenticated() {
        println!("エラー: GitHub CLIが認証されていません");
        println!("gh auth login を実行してログインしてください");
        return CheckStatus::Fail;
    }

    println!("\nブランチ '{}' のPRを検索しています...", branch);

    let number = match gh.find_pr_by_branch(branch) {
        Ok(Some(number)) => number,
        Ok(None) => {
            println!("警告: ブランチ {} のPRが見つかりません", branch);
            return conclude(key, cache, CheckStatus::Pass);
        }
        Err(e) => {
            println!("GitHub CLIコマンドの実行中にエラーが発生しました: {}", e);
            return CheckStatus::Fail;
        }
    };

    println!("PR #{} のステータスチェックを確認しています...", number);

    match gh.failing_checks(number) {
        Ok(failing) if failing.is_empty() => {
            println!("PR #{} のステータスチェックはすべて成功しています", number);
            conclude(key, cache, CheckStatus::Pass)
        }
        Ok(failing) => {
            println!("エラー: PR #{} のステータスチェックが失敗しています", number);
            for check in &failing {
                println!("  - {}: {}", check.context, check.description);
            }
            conclude(key, cache, CheckStatus::Fail)
        }
        Err(e) => {
            println!("GitHub CLIコマンドの実行中にエラーが発生しました: {}", e);
            CheckStatus::Fail
        }
    }
}

/// Record a final determination in the cache and return it.
fn conclude(key: &CacheKey, cache: &impl StatusCache, status: CheckStatus) -> CheckStatus {
    if let Err(e) = cache.set(key, status) {
        println!("警告: キャッシュの書き込みに失敗しました: {}", e);
    }
    status
}
