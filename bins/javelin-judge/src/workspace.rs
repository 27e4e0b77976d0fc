/// Workspace Manager - Submission-Scoped Scratch Directories
///
/// **Core Responsibility:**
/// Give each in-flight submission its own directory holding the source file
/// and the compiled classes, and remove it unconditionally afterwards.
///
/// **Isolation Rules:**
/// 1. Directory names embed a fresh uuid, so concurrent submissions never
///    collide and no class file from an earlier submission can leak into a
///    later run.
/// 2. Cleanup runs on every exit path (success, compile failure, crash,
///    timeout, infrastructure error) via a Drop guard.
/// 3. A workspace is never reused.
use anyhow::{Context, Result};
use javelin_common::types::Submission;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Entry-point class name the Java toolchain requires.
pub const MAIN_CLASS: &str = "Main";
/// Fixed source file name matching the entry-point class.
pub const SOURCE_FILE: &str = "Main.java";

pub struct Workspace {
    id: Uuid,
    dir: PathBuf,
}

impl Workspace {
    /// Create the workspace directory and write the submitted source into
    /// `Main.java`.
    ///
    /// Directory or file creation failure is an infrastructure error, not a
    /// user code error; the caller aborts judging without a verdict.
    pub async fn prepare(root: &Path, submission: &Submission) -> Result<Self> {
        let id = Uuid::new_v4();
        let dir = root.join(format!("submission-{id}"));

        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create workspace {}", dir.display()))?;

        // Guard is live from here on, so a failed source write still
        // removes the directory.
        let workspace = Workspace { id, dir };

        let source_path = workspace.source_path();
        tokio::fs::write(&source_path, &submission.source_code)
            .await
            .with_context(|| format!("Failed to write {}", source_path.display()))?;

        debug!(
            workspace = %workspace.id,
            dir = %workspace.dir.display(),
            source_bytes = submission.source_code.len(),
            "Workspace prepared"
        );

        Ok(workspace)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Directory used as the compile target and the run classpath.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn source_path(&self) -> PathBuf {
        self.dir.join(SOURCE_FILE)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        // Best-effort removal; log if cleanup fails but don't panic.
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    workspace = %self.id,
                    dir = %self.dir.display(),
                    error = %e,
                    "Failed to remove workspace"
                );
            }
        }
    }
}
