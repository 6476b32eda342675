use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use super::{Result, ResultExt};

/// Default file name for the results document
pub const RESULTS_FILE: &str = "test-results.json";

/// Local time in the iso format used by the results document
pub fn now() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Outcome of a single check
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    /// Structured extras, e.g. what was missing
    #[serde(default)]
    pub details: Option<Value>,
}

impl TestResult {
    pub fn pass(name: &str, message: impl Into<String>) -> TestResult {
        TestResult { name: name.into(), passed: true, message: message.into(), details: None }
    }

    pub fn fail(name: &str, message: impl Into<String>) -> TestResult {
        TestResult { name: name.into(), passed: false, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: Value) -> TestResult {
        self.details = Some(details);
        self
    }
}

/// The json results document shared between the runner and the reporter
///
/// Every key is optional when reading so partial documents from other tools still report.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TestReport {
    pub timestamp: String,
    pub chart_dir: String,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub results: Vec<TestResult>,
}

impl Default for TestReport {
    fn default() -> Self {
        TestReport {
            timestamp: now(),
            chart_dir: String::new(),
            total_tests: 0,
            passed_tests: 0,
            failed_tests: 0,
            results: vec![],
        }
    }
}

impl TestReport {
    /// Summarise a list of results, counting passes and failures
    pub fn new(chart_dir: &str, results: Vec<TestResult>) -> TestReport {
        let passed = results.iter().filter(|r| r.passed).count();
        TestReport {
            timestamp: now(),
            chart_dir: chart_dir.into(),
            total_tests: results.len(),
            passed_tests: passed,
            failed_tests: results.len() - passed,
            results,
        }
    }

    /// Load a results document
    ///
    /// A missing file yields an empty report rather than an error.
    pub fn load(pth: &Path) -> Result<TestReport> {
        if !pth.exists() {
            warn!("{} not found, creating empty report", pth.display());
            return Ok(TestReport::default());
        }
        let data = fs::read_to_string(pth)?;
        let res = serde_json::from_str(&data).chain_err(|| format!("failed to parse {}", pth.display()))?;
        Ok(res)
    }

    /// Write the document as indented json
    pub fn save(&self, pth: &Path) -> Result<()> {
        let mut f = File::create(pth)?;
        let encoded = serde_json::to_string_pretty(self)?;
        write!(f, "{}", encoded)?;
        debug!("Wrote results to {}: \n{}", pth.display(), encoded);
        Ok(())
    }
}
