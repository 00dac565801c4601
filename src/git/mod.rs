//! Candidate file discovery through git plumbing
//!
//! The file sets mirror what the surrounding CI expects: the full set comes
//! from `ls-files` across cached/modified/untracked entries (so .gitignore is
//! honored), the changed set from `diff-index` against HEAD plus the
//! working-tree `ls-files` listing. Paths are filtered by a pattern matched
//! from the start of the path and de-duplicated in first-seen order.

use anyhow::{Result, bail};
use regex::Regex;

use crate::external;

/// All candidate files in the repository matching `pattern`.
pub fn all_files(git: &str, pattern: &Regex) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let listing = list_output(
        git,
        &[
            "ls-files",
            "--exclude-standard",
            "--modified",
            "--others",
            "--cached",
        ],
    )?;
    collect_matches(&listing, pattern, &mut files);
    Ok(files)
}

/// Modified/added candidate files matching `pattern`. With `index_only`,
/// restrict to files staged in the index.
pub fn changed_files(git: &str, pattern: &Regex, index_only: bool) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let staged = list_output(git, &["diff-index", "--cached", "--name-only", "HEAD"])?;
    collect_matches(&staged, pattern, &mut files);

    if index_only {
        return Ok(files);
    }

    let worktree = list_output(
        git,
        &["ls-files", "--exclude-standard", "--modified", "--others"],
    )?;
    collect_matches(&worktree, pattern, &mut files);
    Ok(files)
}

/// Run a git listing command and hand back stdout. Only a spawn failure is
/// fatal; a non-zero exit (e.g. no HEAD yet) yields whatever was listed.
fn list_output(git: &str, args: &[&str]) -> Result<String> {
    let outcome = external::run_tool(git, args);
    if outcome.launch_failed {
        bail!("Unable to run {git}: {}", outcome.stderr.trim());
    }
    Ok(outcome.stdout)
}

/// Append pattern matches from a newline-separated listing, skipping paths
/// already collected. The pattern is anchored at the start of the path,
/// matching `re.match` semantics of the surrounding CI scripts.
fn collect_matches(listing: &str, pattern: &Regex, files: &mut Vec<String>) {
    for line in listing.lines() {
        if line.is_empty() {
            continue;
        }
        let matches_start = pattern.find(line).is_some_and(|m| m.start() == 0);
        if matches_start && !files.iter().any(|f| f == line) {
            files.push(line.to_string());
        }
    }
}
