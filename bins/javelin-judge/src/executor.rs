/// Judge - High-Level Orchestration
///
/// **Responsibility:**
/// Coordinate workspace, engine, evaluator, and progress recorder to turn
/// one (problem id, source code) pair into a Verdict.
///
/// **Control flow:**
/// catalog lookup -> workspace prepare -> compile -> run cases sequentially
/// -> aggregate -> record progress -> workspace cleanup (via Drop).
///
/// This module knows nothing about:
/// - How processes are spawned (engine's job)
/// - How outputs are compared (evaluator's job)
///
/// **Error contract:**
/// Compile errors, runtime crashes, and timeouts all resolve into a Verdict.
/// `Err` is reserved for infrastructure failures (workspace creation,
/// missing toolchain); those abort the submission with nothing persisted.
use anyhow::{Context, Result};
use javelin_common::types::{Problem, Submission, Verdict};
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::ProblemCatalog;
use crate::config::JudgeConfig;
use crate::engine;
use crate::evaluator;
use crate::progress::ProgressRecorder;
use crate::workspace::Workspace;

pub struct Judge {
    config: JudgeConfig,
    catalog: ProblemCatalog,
    recorder: ProgressRecorder,
}

impl Judge {
    pub fn new(config: JudgeConfig, catalog: ProblemCatalog) -> Result<Self> {
        std::fs::create_dir_all(&config.workspace_root).with_context(|| {
            format!(
                "Failed to create workspace root {}",
                config.workspace_root.display()
            )
        })?;
        let recorder = ProgressRecorder::new(&config.progress_dir)?;

        Ok(Judge {
            config,
            catalog,
            recorder,
        })
    }

    /// Judge one submission end to end.
    ///
    /// Always returns a structured Verdict for user-attributable outcomes;
    /// only infrastructure failures surface as `Err`.
    #[instrument(skip(self, source_code), fields(problem_id = %problem_id))]
    pub async fn judge(&self, problem_id: &str, source_code: &str) -> Result<Verdict> {
        let Some(problem) = self.catalog.get(problem_id) else {
            warn!("Rejected submission for unknown problem");
            return Ok(Verdict::invalid_problem());
        };

        let submission = Submission {
            problem_id: problem_id.to_string(),
            source_code: source_code.to_string(),
        };

        let workspace = Workspace::prepare(&self.config.workspace_root, &submission).await?;
        info!(
            workspace = %workspace.id(),
            test_cases = problem.test_cases.len(),
            source_size = source_code.len(),
            "Judging submission"
        );

        // Workspace cleanup runs on every path out of this scope, including
        // the `?` above returning an infrastructure error mid-run.
        let verdict = self.run_submission(problem, &workspace).await?;

        info!(
            workspace = %workspace.id(),
            overall_passed = verdict.overall_passed,
            results = verdict.results.len(),
            "Verdict produced"
        );

        // Persistence failure is logged but never overturns a verdict the
        // user already earned.
        if let Err(e) = self
            .recorder
            .record(problem_id, source_code, verdict.overall_passed)
            .await
        {
            error!(error = %e, "Failed to record submission progress");
        }

        Ok(verdict)
    }

    async fn run_submission(&self, problem: &Problem, workspace: &Workspace) -> Result<Verdict> {
        let compile = engine::compile(&self.config, workspace).await?;
        if !compile.success {
            warn!(
                diagnostics_len = compile.diagnostics.len(),
                "Compilation failed; no test case attempted"
            );
            return Ok(evaluator::aggregate(&compile, Vec::new()));
        }

        let mut results = Vec::with_capacity(problem.test_cases.len());

        for (idx, test_case) in problem.test_cases.iter().enumerate() {
            let output = engine::run_case(&self.config, workspace, &test_case.args).await?;

            if output.timed_out {
                warn!(
                    test_num = idx + 1,
                    elapsed_ms = output.execution_time_ms,
                    "Test run exceeded the time limit; aborting remaining cases"
                );
                return Ok(Verdict::runtime_error("time limit exceeded"));
            }

            if output.crashed() {
                warn!(
                    test_num = idx + 1,
                    exit_code = ?output.exit_code,
                    "Test run crashed; aborting remaining cases"
                );
                return Ok(Verdict::runtime_error(&output.stderr));
            }

            let result = evaluator::evaluate_case(test_case, &output);
            debug!(
                test_num = idx + 1,
                passed = result.passed,
                elapsed_ms = output.execution_time_ms,
                "Test case evaluated"
            );
            results.push(result);
        }

        Ok(evaluator::aggregate(&compile, results))
    }
}
