// Progress Recorder - append-only per-problem submission log.
//
// Write-only from the judge's perspective: the core never reads these files
// back. Appends to the same file are serialized through a mutex so records
// for one problem keep submission order and never interleave.
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

pub struct ProgressRecorder {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl ProgressRecorder {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create progress log dir {}", dir.display()))?;

        Ok(ProgressRecorder {
            dir: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Append one submission record (status, source code, timestamp) to the
    /// problem's log file.
    pub async fn record(&self, problem_id: &str, source_code: &str, passed: bool) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let status = if passed { "Correct" } else { "Incorrect" };
        let entry = format!("[{timestamp}] Status: {status}\nCode:\n{source_code}\n----\n");

        let path = self.log_path(problem_id);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open progress log {}", path.display()))?;

        file.write_all(entry.as_bytes())
            .await
            .with_context(|| format!("Failed to append to progress log {}", path.display()))?;

        debug!(problem_id, status, "Recorded submission progress");
        Ok(())
    }

    pub fn log_path(&self, problem_id: &str) -> PathBuf {
        self.dir.join(format!("user_progress_q{problem_id}.txt"))
    }
}
