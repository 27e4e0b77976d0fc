// Problem catalog management.
//
// The catalog is loaded once at startup from problems.json and is read-only
// for the rest of the process lifetime; judging never mutates it.
use anyhow::{bail, Context, Result};
use javelin_common::types::Problem;
use std::collections::HashMap;
use std::path::Path;

pub struct ProblemCatalog {
    problems: HashMap<String, Problem>,
}

impl ProblemCatalog {
    /// Load the catalog from a JSON file holding an array of problems.
    pub fn load(catalog_path: &Path) -> Result<Self> {
        if !catalog_path.exists() {
            bail!("Problem catalog not found: {}", catalog_path.display());
        }

        let content = std::fs::read_to_string(catalog_path)
            .context("Failed to read problem catalog")?;

        let problems: Vec<Problem> =
            serde_json::from_str(&content).context("Failed to parse problem catalog")?;

        Ok(Self::from_problems(problems))
    }

    /// Load with default path (config/problems.json).
    pub fn load_default() -> Result<Self> {
        Self::load(Path::new("config/problems.json"))
    }

    pub fn from_problems(problems: Vec<Problem>) -> Self {
        let problems = problems.into_iter().map(|p| (p.id.clone(), p)).collect();
        ProblemCatalog { problems }
    }

    /// Resolve a problem id. `None` short-circuits judging with an
    /// invalid-problem verdict before any workspace is created.
    pub fn get(&self, problem_id: &str) -> Option<&Problem> {
        self.problems.get(problem_id)
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// List all known problem ids.
    pub fn problem_ids(&self) -> Vec<String> {
        self.problems.keys().cloned().collect()
    }
}
