use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::results::TestReport;
use super::Result;

/// Default file name for the junit report
pub const REPORT_FILE: &str = "test-report.xml";

const SUITES_NAME: &str = "Helm Chart Tests";
const SUITE_NAME: &str = "Helm Chart Validation";
const CLASSNAME: &str = "HelmChartTester";

fn escape_text(input: &str) -> String {
    input.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(input: &str) -> String {
    escape_text(input)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#09;")
}

/// Render a results document as junit xml
///
/// Suite counts are taken from the document as is, not recounted from its results.
pub fn junit(rep: &TestReport) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<testsuites name=\"{}\" tests=\"{}\" failures=\"{}\" time=\"0.0\">",
        SUITES_NAME, rep.total_tests, rep.failed_tests
    ));
    out.push_str(&format!(
        "<testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" time=\"0.0\" timestamp=\"{}\">",
        SUITE_NAME,
        rep.total_tests,
        rep.failed_tests,
        escape_attr(&rep.timestamp)
    ));
    for r in &rep.results {
        let open = format!(
            "<testcase name=\"{}\" classname=\"{}\" time=\"0.0\"",
            escape_attr(&r.name),
            CLASSNAME
        );
        if r.passed {
            out.push_str(&open);
            out.push_str(" />");
        } else {
            out.push_str(&open);
            out.push_str(&format!(
                "><failure message=\"{}\">{}</failure></testcase>",
                escape_attr(&r.message),
                escape_text(&r.message)
            ));
        }
    }
    out.push_str("</testsuite></testsuites>");
    out
}

/// Percentage of passed tests, if any ran
pub fn success_rate(rep: &TestReport) -> Option<f64> {
    if rep.total_tests == 0 {
        return None;
    }
    Some(rep.passed_tests as f64 / rep.total_tests as f64 * 100.0)
}

/// Convert a results file into a junit report file
///
/// A missing input produces an empty report.
pub fn generate(input: &Path, output: &Path) -> Result<TestReport> {
    info!("Generating test report from {}", input.display());
    let rep = TestReport::load(input)?;
    let xml = junit(&rep);
    let mut f = File::create(output)?;
    write!(f, "{}", xml)?;
    info!("JUnit report generated: {}", output.display());

    info!("Total tests: {}", rep.total_tests);
    info!("Passed: {}", rep.passed_tests);
    info!("Failed: {}", rep.failed_tests);
    if let Some(rate) = success_rate(&rep) {
        info!("Success rate: {:.1}%", rate);
    }
    Ok(rep)
}
