/// Execution Engine - Toolchain Process Invocation
///
/// **Core Responsibility:**
/// Spawn the external compiler and runtime as child processes, capture their
/// stdout/stderr, and enforce a wall-clock deadline on every invocation.
///
/// **Critical Architectural Boundary:**
/// - Engine knows HOW to run the toolchain (spawn, capture, kill on timeout)
/// - Engine does NOT compare outputs or decide verdicts
/// - Engine returns raw outcomes for the Evaluator to judge
///
/// **Toolchain Contract (fixed, external):**
/// - Compiler: `<javac_path> <workspace>/Main.java`
/// - Runtime:  `<java_path> -cp <workspace> Main <args...>`
use anyhow::{Context, Result};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::JudgeConfig;
use crate::workspace::{Workspace, MAIN_CLASS};

/// Result of one compiler invocation.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    pub success: bool,
    /// Captured compiler stderr, verbatim and untruncated.
    pub diagnostics: String,
}

impl CompileOutcome {
    pub fn success() -> Self {
        CompileOutcome {
            success: true,
            diagnostics: String::new(),
        }
    }

    pub fn failure(diagnostics: String) -> Self {
        CompileOutcome {
            success: false,
            diagnostics,
        }
    }
}

/// Raw outcome of one child process, before any correctness judgment.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub execution_time_ms: u64,
    pub timed_out: bool,
}

impl RunOutput {
    /// Process-level failure: the run finished but exited nonzero (or was
    /// killed by a signal, which leaves no exit code).
    pub fn crashed(&self) -> bool {
        !self.timed_out && self.exit_code != Some(0)
    }
}

/// Compile the workspace's source file.
///
/// Blocks (asynchronously) until the compiler exits or the configured
/// deadline expires. Exit 0 means success; anything else is a user-facing
/// compile failure carrying the compiler's stderr.
pub async fn compile(config: &JudgeConfig, workspace: &Workspace) -> Result<CompileOutcome> {
    let source = workspace.source_path();
    debug!(source = %source.display(), "Invoking compiler");

    let mut cmd = Command::new(&config.javac_path);
    cmd.arg(&source);

    let output = run_with_deadline(&mut cmd, Duration::from_millis(config.compile_timeout_ms))
        .await
        .with_context(|| {
            format!(
                "Failed to invoke compiler at {}",
                config.javac_path.display()
            )
        })?;

    if output.timed_out {
        warn!(
            elapsed_ms = output.execution_time_ms,
            "Compiler exceeded the time limit"
        );
        return Ok(CompileOutcome::failure(
            "compiler exceeded the time limit".to_string(),
        ));
    }

    if output.exit_code == Some(0) {
        debug!(elapsed_ms = output.execution_time_ms, "Compilation succeeded");
        Ok(CompileOutcome::success())
    } else {
        Ok(CompileOutcome::failure(output.stderr))
    }
}

/// Run the compiled entry point once with one test case's arguments.
///
/// The classpath is restricted to the workspace directory. The run is bounded
/// by the configured timeout; on expiry the child is force-killed and the
/// output is reported with `timed_out` set.
pub async fn run_case(
    config: &JudgeConfig,
    workspace: &Workspace,
    args: &[String],
) -> Result<RunOutput> {
    let mut cmd = Command::new(&config.java_path);
    cmd.arg("-cp").arg(workspace.dir()).arg(MAIN_CLASS).args(args);

    run_with_deadline(&mut cmd, Duration::from_millis(config.run_timeout_ms))
        .await
        .with_context(|| format!("Failed to invoke runtime at {}", config.java_path.display()))
}

/// Spawn a child process with piped stdout/stderr and wait for it under a
/// wall-clock deadline, killing it on expiry.
///
/// Output pipes are drained concurrently with the wait so a chatty child can
/// never deadlock on a full pipe. Partial output captured before a timeout
/// is preserved.
async fn run_with_deadline(cmd: &mut Command, deadline: Duration) -> Result<RunOutput> {
    let start = Instant::now();

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .context("Failed to spawn child process")?;

    let mut stdout_pipe = child.stdout.take().context("Child stdout not captured")?;
    let mut stderr_pipe = child.stderr.take().context("Child stderr not captured")?;
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    let waited = tokio::time::timeout(deadline, async {
        tokio::try_join!(
            child.wait(),
            stdout_pipe.read_to_end(&mut stdout),
            stderr_pipe.read_to_end(&mut stderr),
        )
    })
    .await;

    match waited {
        Ok(result) => {
            let (status, _, _) = result.context("Failed to wait for child process")?;
            Ok(RunOutput {
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
                exit_code: status.code(),
                execution_time_ms: start.elapsed().as_millis() as u64,
                timed_out: false,
            })
        }
        Err(_) => {
            // Deadline expired: force-kill and reap the child.
            if let Err(e) = child.start_kill() {
                warn!(error = %e, "Failed to kill timed-out child process");
            }
            let _ = child.wait().await;

            Ok(RunOutput {
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
                exit_code: None,
                execution_time_ms: start.elapsed().as_millis() as u64,
                timed_out: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crashed_classification() {
        let ok = RunOutput {
            stdout: "7".to_string(),
            stderr: String::new(),
            exit_code: Some(0),
            execution_time_ms: 12,
            timed_out: false,
        };
        let crash = RunOutput {
            exit_code: Some(1),
            ..ok.clone()
        };
        let signal = RunOutput {
            exit_code: None,
            ..ok.clone()
        };
        let timeout = RunOutput {
            exit_code: None,
            timed_out: true,
            ..ok.clone()
        };

        assert!(!ok.crashed());
        assert!(crash.crashed());
        assert!(signal.crashed());
        // A timeout is reported as timed_out, not as a crash.
        assert!(!timeout.crashed());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_deadline_kills_long_running_process() {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg("echo started; sleep 30");

        let output = run_with_deadline(&mut cmd, Duration::from_millis(200))
            .await
            .unwrap();

        assert!(output.timed_out);
        assert!(output.exit_code.is_none());
        // Partial output written before the deadline is preserved.
        assert_eq!(output.stdout.trim_end(), "started");
        assert!(output.execution_time_ms < 5_000);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_streams_and_exit_code() {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg("echo out; echo err >&2; exit 3");

        let output = run_with_deadline(&mut cmd, Duration::from_secs(5))
            .await
            .unwrap();

        assert!(!output.timed_out);
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout.trim_end(), "out");
        assert_eq!(output.stderr.trim_end(), "err");
        assert!(output.crashed());
    }

    #[tokio::test]
    async fn test_missing_executable_is_an_error() {
        let mut cmd = Command::new("/nonexistent/javelin-toolchain");

        let result = run_with_deadline(&mut cmd, Duration::from_secs(1)).await;

        assert!(result.is_err());
    }
}
