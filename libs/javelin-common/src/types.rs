use serde::{Deserialize, Deserializer, Serialize};

/// Immutable problem descriptor from the catalog.
///
/// Loaded once at startup and read-only during judging. Test cases are kept
/// in declaration order; case numbering in feedback depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(deserialize_with = "stringify")]
    pub id: String,
    pub test_cases: Vec<TestCase>,
}

/// One (arguments, expected output) pair.
///
/// Catalog files may carry numeric values for `args` and `expected_output`;
/// both are stringified on load, since the runtime receives every argument
/// as a command-line string and comparison is string equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(deserialize_with = "stringify_seq")]
    pub args: Vec<String>,
    #[serde(deserialize_with = "stringify")]
    pub expected_output: String,
}

/// One user's attempt at a problem. Never persisted as-is; only its
/// outcome reaches the progress log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub problem_id: String,
    pub source_code: String,
}

/// Outcome of a single test case, ordered to match the problem's
/// test case order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub args: Vec<String>,
    pub expected_output: String,
    pub actual_output: String,
    pub passed: bool,
}

/// Final structured outcome of judging one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub results: Vec<CaseResult>,
    pub overall_passed: bool,
    pub message: String,
}

impl Verdict {
    pub const MSG_ALL_PASSED: &'static str = "All test cases passed!";
    pub const MSG_SOME_FAILED: &'static str = "Some test cases failed.";
    pub const MSG_INVALID_PROBLEM: &'static str = "Invalid problem ID";

    /// Verdict for a problem id that does not resolve in the catalog.
    pub fn invalid_problem() -> Self {
        Verdict {
            results: Vec::new(),
            overall_passed: false,
            message: Self::MSG_INVALID_PROBLEM.to_string(),
        }
    }

    /// Verdict for a failed compile. No case is attempted; the compiler's
    /// diagnostics travel verbatim in the message.
    pub fn compile_error(diagnostics: &str) -> Self {
        Verdict {
            results: Vec::new(),
            overall_passed: false,
            message: format!("Compilation error: {diagnostics}"),
        }
    }

    /// Verdict for a process-level run failure (crash or timeout). Results
    /// for cases that already passed are discarded, matching the judge's
    /// all-or-nothing contract.
    pub fn runtime_error(detail: &str) -> Self {
        Verdict {
            results: Vec::new(),
            overall_passed: false,
            message: format!("Runtime error: {detail}"),
        }
    }

    /// Verdict for a submission whose every case ran to completion.
    pub fn from_results(results: Vec<CaseResult>) -> Self {
        let overall_passed = results.iter().all(|r| r.passed);
        let message = if overall_passed {
            Self::MSG_ALL_PASSED
        } else {
            Self::MSG_SOME_FAILED
        };
        Verdict {
            results,
            overall_passed,
            message: message.to_string(),
        }
    }
}

fn value_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn stringify<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_string(value))
}

fn stringify_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values.into_iter().map(value_to_string).collect())
}
