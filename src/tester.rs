use std::path::{Path, PathBuf};

use crate::checks;
use crate::config::Expectations;
use crate::helm::{self, Rendered};
use crate::results::{TestReport, TestResult};
use super::{ErrorKind, Result};

/// Pass/fail tallies for a run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Renders a chart twice and runs every check against the output
pub struct ChartTester {
    chart_dir: PathBuf,
    exp: Expectations,
    results: Vec<TestResult>,
    rendered: Rendered,
    rendered_custom: Rendered,
}

impl ChartTester {
    pub fn new(chart_dir: &Path, exp: Expectations) -> ChartTester {
        ChartTester {
            chart_dir: chart_dir.to_path_buf(),
            exp,
            results: vec![],
            rendered: Rendered::Failed("not rendered".into()),
            rendered_custom: Rendered::Failed("not rendered".into()),
        }
    }

    fn render(&self, values: &str) -> Rendered {
        helm::template(&self.exp.helm, &self.chart_dir, &self.exp.release, values)
    }

    /// Run the checks in order, recording and logging each result
    ///
    /// Checks that need a render still run when that render failed, and fail.
    pub fn run_all(&mut self) -> &[TestResult] {
        info!("Starting helm chart tests in {}", self.chart_dir.display());
        self.results.clear();

        debug!("Testing chart rendering");
        self.rendered = self.render(&self.exp.valuesFile);
        let r = checks::chart_rendering(&self.rendered);
        self.record(r);

        debug!("Testing custom values rendering");
        self.rendered_custom = self.render(&self.exp.customValuesFile);
        let r = checks::custom_values_rendering(&self.rendered_custom);
        self.record(r);

        let text = self.rendered.text();
        let custom = self.rendered_custom.text();
        let rest = vec![
            checks::required_resources(text, &self.exp),
            checks::specific_resources(text, &self.exp),
            checks::namespace_consistency(text, &self.exp),
            checks::custom_namespace(custom, &self.exp),
            checks::service_selectors(text, &self.exp),
            checks::image_references(text, &self.exp),
            checks::port_configurations(text, &self.exp),
            checks::environment_variables(text, &self.exp),
        ];
        for r in rest {
            self.record(r);
        }
        &self.results
    }

    fn record(&mut self, r: TestResult) {
        if r.passed {
            info!("PASS {}: {}", r.name, r.message);
        } else {
            warn!("FAIL {}: {}", r.name, r.message);
        }
        self.results.push(r);
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn summary(&self) -> Summary {
        let passed = self.results.iter().filter(|r| r.passed).count();
        Summary {
            total: self.results.len(),
            passed,
            failed: self.results.len() - passed,
        }
    }

    /// The results document for this run
    pub fn report(&self) -> TestReport {
        TestReport::new(&self.chart_dir.display().to_string(), self.results.clone())
    }

    pub fn save_results(&self, pth: &Path) -> Result<()> {
        self.report().save(pth)?;
        info!("Test results saved to {}", pth.display());
        Ok(())
    }
}

/// Run every check against a chart and save the results document
///
/// Results are saved whether or not the checks pass. Errors with `TestsFailed` when any check fails.
pub fn run(chart_dir: &Path, exp: Expectations, output: &Path) -> Result<Summary> {
    exp.verify()?;
    let mut ct = ChartTester::new(chart_dir, exp);
    ct.run_all();
    let sum = ct.summary();
    info!("Total tests: {}", sum.total);
    info!("Passed: {}", sum.passed);
    info!("Failed: {}", sum.failed);
    ct.save_results(output)?;
    if !sum.all_passed() {
        warn!("Some tests failed!");
        bail!(ErrorKind::TestsFailed(sum.failed, sum.total));
    }
    info!("All tests passed!");
    Ok(sum)
}
