/// Evaluator - Output Comparison and Verdict Aggregation
///
/// **Core Responsibility:**
/// Compare raw run outputs against expected outputs and fold per-case
/// results into a single Verdict.
///
/// **Critical Properties:**
/// - Knows nothing about processes or the toolchain
/// - Knows nothing about the filesystem
/// - Pure functions: (raw outputs, expected outputs) -> verdict
///
/// **Normalization Rules:**
/// - Trim trailing whitespace: YES (both sides)
/// - Trim leading whitespace: NO
/// - Case sensitivity: YES (exact match required)
/// - Numeric tolerance / reordering: NO
///
/// Output format is part of the exercise contract, so comparison is exact
/// byte equality after the trailing trim.
use javelin_common::types::{CaseResult, TestCase, Verdict};

use crate::engine::{CompileOutcome, RunOutput};

/// Normalize output for comparison: trailing whitespace only.
fn normalize_output(output: &str) -> &str {
    output.trim_end()
}

/// Judge one completed run against its test case.
///
/// Only called for runs that finished with exit 0; crashes and timeouts
/// never reach comparison.
pub fn evaluate_case(test_case: &TestCase, output: &RunOutput) -> CaseResult {
    let actual = normalize_output(&output.stdout);
    let passed = actual == normalize_output(&test_case.expected_output);

    CaseResult {
        args: test_case.args.clone(),
        expected_output: test_case.expected_output.clone(),
        actual_output: actual.to_string(),
        passed,
    }
}

/// Fold a compile outcome and the per-case results into the final Verdict.
///
/// Compile failure wins outright: no case result exists and the compiler's
/// diagnostics travel in the message. Otherwise the verdict passes only if
/// every case passed; per-case detail stays in `results`, the message is a
/// fixed summary string.
pub fn aggregate(compile: &CompileOutcome, results: Vec<CaseResult>) -> Verdict {
    if !compile.success {
        return Verdict::compile_error(&compile.diagnostics);
    }

    Verdict::from_results(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_case(args: &[&str], expected: &str) -> TestCase {
        TestCase {
            args: args.iter().map(|s| s.to_string()).collect(),
            expected_output: expected.to_string(),
        }
    }

    fn make_output(stdout: &str) -> RunOutput {
        RunOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: Some(0),
            execution_time_ms: 10,
            timed_out: false,
        }
    }

    #[test]
    fn test_normalize_output() {
        assert_eq!(normalize_output("42"), "42");
        assert_eq!(normalize_output("42\n"), "42");
        assert_eq!(normalize_output("42 \t\n"), "42");
        assert_eq!(normalize_output(""), "");
        assert_eq!(normalize_output("   "), "");
        // Leading and internal whitespace are preserved.
        assert_eq!(normalize_output("  42"), "  42");
        assert_eq!(normalize_output("4 2\n"), "4 2");
    }

    #[test]
    fn test_exact_match_passes() {
        let case = make_test_case(&["3", "4"], "7");
        let result = evaluate_case(&case, &make_output("7\n"));

        assert!(result.passed);
        assert_eq!(result.actual_output, "7");
        assert_eq!(result.args, vec!["3", "4"]);
    }

    #[test]
    fn test_zero_padding_fails() {
        let case = make_test_case(&[], "42");
        let result = evaluate_case(&case, &make_output("042"));

        assert!(!result.passed);
        assert_eq!(result.actual_output, "042");
    }

    #[test]
    fn test_trailing_space_then_content_fails() {
        let case = make_test_case(&[], "42");
        let result = evaluate_case(&case, &make_output("42 x"));

        assert!(!result.passed);
    }

    #[test]
    fn test_case_sensitivity() {
        let case = make_test_case(&[], "Hello");
        let result = evaluate_case(&case, &make_output("hello"));

        assert!(!result.passed);
    }

    #[test]
    fn test_multiline_trailing_newline_passes() {
        let case = make_test_case(&[], "line1\nline2");
        let result = evaluate_case(&case, &make_output("line1\nline2\n"));

        assert!(result.passed);
    }

    #[test]
    fn test_aggregate_compile_failure_has_empty_results() {
        let compile = CompileOutcome::failure("Main.java:1: error: reached end of file".into());

        let verdict = aggregate(&compile, Vec::new());

        assert!(!verdict.overall_passed);
        assert!(verdict.results.is_empty());
        assert!(verdict
            .message
            .starts_with("Compilation error: Main.java:1"));
    }

    #[test]
    fn test_aggregate_all_passed() {
        let compile = CompileOutcome::success();
        let case = make_test_case(&["3", "4"], "7");
        let results = vec![evaluate_case(&case, &make_output("7"))];

        let verdict = aggregate(&compile, results);

        assert!(verdict.overall_passed);
        assert_eq!(verdict.message, Verdict::MSG_ALL_PASSED);
        assert_eq!(verdict.results.len(), 1);
    }

    #[test]
    fn test_aggregate_mixed_results_fails_overall() {
        let compile = CompileOutcome::success();
        let results = vec![
            evaluate_case(&make_test_case(&[], "a"), &make_output("a")),
            evaluate_case(&make_test_case(&[], "b"), &make_output("wrong")),
        ];

        let verdict = aggregate(&compile, results);

        assert!(!verdict.overall_passed);
        assert_eq!(verdict.message, Verdict::MSG_SOME_FAILED);
        assert!(verdict.results[0].passed);
        assert!(!verdict.results[1].passed);
    }

    #[test]
    fn test_aggregate_preserves_case_order() {
        let compile = CompileOutcome::success();
        let results = vec![
            evaluate_case(&make_test_case(&["1"], "one"), &make_output("one")),
            evaluate_case(&make_test_case(&["2"], "two"), &make_output("two")),
            evaluate_case(&make_test_case(&["3"], "three"), &make_output("three")),
        ];

        let verdict = aggregate(&compile, results);

        let args: Vec<_> = verdict.results.iter().map(|r| r.args[0].as_str()).collect();
        assert_eq!(args, vec!["1", "2", "3"]);
    }
}
