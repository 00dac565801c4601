//! Compilation database filter for clang-tidy
//!
//! clang-tidy only understands files that appear in the build's
//! `compile_commands.json`; anything else is dropped before it is enqueued.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CompileCommand {
    file: String,
    directory: String,
}

/// Load the set of absolute source paths known to the build at
/// `<build_path>/compile_commands.json`.
pub fn load_compile_commands(build_path: &Path) -> Result<HashSet<PathBuf>> {
    let path = build_path.join("compile_commands.json");
    let data = fs::read_to_string(&path)
        .with_context(|| format!("Could not find compilation database at {}", path.display()))?;
    let entries: Vec<CompileCommand> = serde_json::from_str(&data)
        .with_context(|| format!("Malformed compilation database at {}", path.display()))?;

    Ok(entries
        .iter()
        .map(|entry| resolve(Path::new(&entry.file), Path::new(&entry.directory)))
        .collect())
}

/// Keep only candidates the database knows about, resolving relative
/// candidate paths against `cwd`.
pub fn filter_candidates(
    files: &[String],
    database: &HashSet<PathBuf>,
    cwd: &Path,
) -> Vec<String> {
    files
        .iter()
        .filter(|file| database.contains(&resolve(Path::new(file), cwd)))
        .cloned()
        .collect()
}

/// Resolve `file` against `base` lexically, the same way the database
/// entries were written. No filesystem access.
pub fn resolve(file: &Path, base: &Path) -> PathBuf {
    let joined = if file.is_absolute() {
        file.to_path_buf()
    } else {
        base.join(file)
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
