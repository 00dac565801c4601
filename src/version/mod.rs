//! Version derivation from git tags
//!
//! Reads the most recent tag, how far HEAD is ahead of it, the short commit
//! SHA and whether the worktree carries local modifications, then renders a
//! C/C++ version header. The header is only rewritten when its content
//! actually changed so build systems do not see spurious updates.

use anyhow::{Context, Result, bail};
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::external;

/// Version information derived from the repository state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitVersion {
    /// Raw tag string as reported by `git describe` (e.g. `v1.2.3-rc1`).
    pub tag: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Pre-release suffix after the dash, empty when absent.
    pub tweak: String,
    /// Commits on HEAD since the tag.
    pub ahead: u64,
    /// Staged, unstaged or untracked changes present.
    pub modified: bool,
    /// Short commit SHA of HEAD.
    pub sha: String,
}

impl GitVersion {
    /// Parse a `v?MAJOR.MINOR.PATCH[-TWEAK]` tag.
    pub fn parse(tag: &str) -> Result<Self> {
        let pattern = Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)(?:-(.+))?$")?;
        let caps = pattern
            .captures(tag.trim())
            .with_context(|| format!("Tag {tag:?} is not a semantic version"))?;

        Ok(Self {
            tag: tag.trim().to_string(),
            major: caps[1].parse()?,
            minor: caps[2].parse()?,
            patch: caps[3].parse()?,
            tweak: caps.get(4).map_or(String::new(), |m| m.as_str().to_string()),
            ahead: 0,
            modified: false,
            sha: String::new(),
        })
    }

    /// Derive the full version from the repository the current directory
    /// belongs to.
    pub fn query(git: &str) -> Result<Self> {
        let tag = check_output(git, &["describe", "--abbrev=0", "--tags"])
            .context("No version tag reachable from HEAD")?;
        let mut version = Self::parse(&tag)?;

        let range = format!("{}..HEAD", version.tag);
        let ahead = check_output(git, &["rev-list", range.as_str(), "--count"])?;
        version.ahead = ahead
            .trim()
            .parse()
            .context("Unexpected rev-list --count output")?;

        let sha = check_output(git, &["rev-parse", "--short", "HEAD"])?;
        version.sha = sha.trim().to_string();

        version.modified = worktree_modified(git)?;
        Ok(version)
    }

    pub fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Full version string: `TAG+AHEAD.SHA`, with `+~` when the worktree is
    /// modified.
    pub fn full(&self) -> String {
        if self.modified {
            format!("{}+~{}.{}", self.tag, self.ahead, self.sha)
        } else {
            format!("{}+{}.{}", self.tag, self.ahead, self.sha)
        }
    }

    /// Render the C/C++ version header.
    pub fn render_header(&self) -> String {
        let modified = if self.modified { 1 } else { 0 };
        format!(
            r#"#ifndef _COMMON_VERSION_H_
#define _COMMON_VERSION_H_

#ifndef VERSION_DEFINES
const constexpr char* VERSION_STRING_FULL = "{full}";
const constexpr char* VERSION_STRING      = "{tag}";
const constexpr size_t VERSION_MAJOR      = {major};
const constexpr size_t VERSION_MINOR      = {minor};
const constexpr size_t VERSION_PATCH      = {patch};
const constexpr char* VERSION_TWEAK       = "{tweak}";
const constexpr size_t VERSION_AHEAD      = {ahead};
const constexpr size_t VERSION_MODIFIED   = {modified};
const constexpr char* VERSION_GIT_SHA     = "{sha}";
#else /* VERSION_DEFINES */
#define VERSION_STRING_FULL "{full}"
#define VERSION_STRING "{tag}"
#define VERSION_MAJOR {major}
#define VERSION_MINOR {minor}
#define VERSION_PATCH {patch}
#define VERSION_TWEAK "{tweak}"
#define VERSION_AHEAD {ahead}
#define VERSION_MODIFIED {modified}
#define VERSION_GIT_SHA "{sha}"
#endif /* VERSION_DEFINES */

#endif /* _COMMON_VERSION_H_ */
"#,
            full = self.full(),
            tag = self.tag,
            major = self.major,
            minor = self.minor,
            patch = self.patch,
            tweak = self.tweak,
            ahead = self.ahead,
            modified = modified,
            sha = self.sha,
        )
    }
}

/// Pull the first `x.y.z` out of arbitrary text, e.g. a `--version` banner.
pub fn extract_triple(text: &str) -> Option<(u64, u64, u64)> {
    let pattern = Regex::new(r"(\d+)\.(\d+)\.(\d+)").ok()?;
    let caps = pattern.captures(text)?;
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

/// Write `data` to `path` only when the current content differs. Returns
/// whether a write happened.
pub fn write_if_changed(path: &Path, data: &str) -> Result<bool> {
    if let Ok(existing) = fs::read_to_string(path)
        && existing == data
    {
        return Ok(false);
    }
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

fn check_output(git: &str, args: &[&str]) -> Result<String> {
    let outcome = external::run_tool(git, args);
    if !outcome.success() {
        bail!(
            "`{}` failed: {}",
            external::render_command(git, args),
            outcome.stderr.trim()
        );
    }
    Ok(outcome.stdout)
}

/// Any staged, unstaged or untracked change marks the worktree modified.
fn worktree_modified(git: &str) -> Result<bool> {
    let staged = external::run_tool(git, &["diff-index", "--quiet", "--cached", "HEAD"]);
    if staged.launch_failed {
        bail!("Unable to run {git}: {}", staged.stderr.trim());
    }
    if staged.exit_code != Some(0) {
        return Ok(true);
    }

    let unstaged = external::run_tool(git, &["diff-files", "--quiet"]);
    if unstaged.exit_code != Some(0) {
        return Ok(true);
    }

    let untracked = check_output(git, &["ls-files", "--others", "--exclude-standard"])?;
    Ok(!untracked.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_prefixed_tags() {
        let version = GitVersion::parse("v1.2.3").unwrap();
        assert_eq!(version.triple(), (1, 2, 3));
        assert_eq!(version.tweak, "");
        assert_eq!(version.tag, "v1.2.3");

        let version = GitVersion::parse("0.10.2").unwrap();
        assert_eq!(version.triple(), (0, 10, 2));
    }

    #[test]
    fn parses_tweak_suffix() {
        let version = GitVersion::parse("v2.0.0-rc1").unwrap();
        assert_eq!(version.triple(), (2, 0, 0));
        assert_eq!(version.tweak, "rc1");
    }

    #[test]
    fn rejects_non_semver_tags() {
        assert!(GitVersion::parse("release-one").is_err());
        assert!(GitVersion::parse("v1.2").is_err());
    }

    #[test]
    fn triple_compare_is_component_wise() {
        // 1.0.9 is newer than 0.9.0; a per-component short-circuit gets
        // this wrong.
        let newer = GitVersion::parse("v1.0.9").unwrap();
        let older = GitVersion::parse("v0.9.0").unwrap();
        assert!(newer.triple() >= older.triple());
        assert!(older.triple() < newer.triple());
    }

    #[test]
    fn full_string_marks_modified_worktrees() {
        let mut version = GitVersion::parse("v1.2.3").unwrap();
        version.ahead = 4;
        version.sha = "abc1234".into();
        assert_eq!(version.full(), "v1.2.3+4.abc1234");

        version.modified = true;
        assert_eq!(version.full(), "v1.2.3+~4.abc1234");
    }

    #[test]
    fn header_carries_all_fields() {
        let mut version = GitVersion::parse("v1.2.3-rc1").unwrap();
        version.ahead = 7;
        version.sha = "deadbee".into();
        let header = version.render_header();

        assert!(header.contains("VERSION_STRING_FULL = \"v1.2.3-rc1+7.deadbee\""));
        assert!(header.contains("const constexpr size_t VERSION_MAJOR      = 1;"));
        assert!(header.contains("#define VERSION_PATCH 3"));
        assert!(header.contains("#define VERSION_TWEAK \"rc1\""));
        assert!(header.contains("const constexpr size_t VERSION_MODIFIED   = 0;"));
        assert!(header.ends_with("#endif /* _COMMON_VERSION_H_ */\n"));
    }

    #[test]
    fn extracts_triple_from_version_banners() {
        assert_eq!(extract_triple("git version 2.39.2"), Some((2, 39, 2)));
        assert_eq!(
            extract_triple("clang-format version 17.0.6 (Fedora 17.0.6-2)"),
            Some((17, 0, 6))
        );
        assert_eq!(extract_triple("no digits here"), None);
    }

    #[test]
    fn writes_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.h");

        assert!(write_if_changed(&path, "content\n").unwrap());
        assert!(!write_if_changed(&path, "content\n").unwrap());
        assert!(write_if_changed(&path, "changed\n").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "changed\n");
    }
}
