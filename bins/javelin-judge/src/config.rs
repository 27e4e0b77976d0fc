// Judge configuration: toolchain paths, workspace root, and timeouts.
// Constructed once in main and passed into the judging subsystem; nothing
// here is process-global state.
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_compile_timeout_ms() -> u64 {
    10_000
}

fn default_run_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Path to the Java compiler executable.
    pub javac_path: PathBuf,
    /// Path to the Java runtime executable.
    pub java_path: PathBuf,
    /// Directory under which per-submission workspaces are created.
    pub workspace_root: PathBuf,
    /// Directory holding the append-only per-problem progress logs.
    pub progress_dir: PathBuf,
    /// Wall-clock bound for one compiler invocation.
    #[serde(default = "default_compile_timeout_ms")]
    pub compile_timeout_ms: u64,
    /// Wall-clock bound for one test case run.
    #[serde(default = "default_run_timeout_ms")]
    pub run_timeout_ms: u64,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        JudgeConfig {
            javac_path: PathBuf::from("javac"),
            java_path: PathBuf::from("java"),
            workspace_root: std::env::temp_dir().join("javelin-workspaces"),
            progress_dir: PathBuf::from("logs/user_progress"),
            compile_timeout_ms: default_compile_timeout_ms(),
            run_timeout_ms: default_run_timeout_ms(),
        }
    }
}

impl JudgeConfig {
    /// Load the judge configuration from a JSON file.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            bail!("Judge config file not found: {}", config_path.display());
        }

        let content = std::fs::read_to_string(config_path)
            .context("Failed to read judge config")?;

        let config: JudgeConfig =
            serde_json::from_str(&content).context("Failed to parse judge config")?;

        if config.compile_timeout_ms == 0 || config.run_timeout_ms == 0 {
            bail!("Judge config timeouts must be nonzero");
        }

        Ok(config)
    }

    /// Load with default path (config/judge.json).
    pub fn load_default() -> Result<Self> {
        Self::load(Path::new("config/judge.json"))
    }
}
