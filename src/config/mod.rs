//! Layered configuration for lintpool
//!
//! Defaults are embedded at compile time and can be overridden by a
//! repository-level `lintpool.toml`/`.yaml` and `LINTPOOL_*` environment
//! variables. Command-line flags override the extracted values last.

use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Toml, Yaml},
};
use serde::Deserialize;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub tools: Tools,
    pub check: Check,
    pub parallel: Parallel,
}

/// Paths of the external binaries this tool drives.
#[derive(Debug, Clone, Deserialize)]
pub struct Tools {
    pub git: String,
    pub clang_format: String,
    pub clang_tidy: String,
    pub clang_apply_replacements: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Check {
    /// Pattern selecting candidate file paths, anchored at the path start.
    pub regex: String,
    /// Header filter passed to clang-tidy.
    pub header_filter: String,
    /// Directory containing compile_commands.json.
    pub build_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parallel {
    /// Tool instances run in parallel; 0 means one per CPU.
    pub jobs: usize,
}

impl Settings {
    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        // A custom config replaces the repository-level lookup entirely.
        if let Some(path) = custom_config {
            figment = if path.ends_with(".yaml") || path.ends_with(".yml") {
                figment.merge(Yaml::file(path))
            } else {
                figment.merge(Toml::file(path))
            };
        } else {
            figment = figment
                .merge(Toml::file("lintpool.toml"))
                .merge(Yaml::file("lintpool.yaml"))
                .merge(Yaml::file("lintpool.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("LINTPOOL_"));

        Ok(figment.extract()?)
    }
}
