#![cfg(unix)]
mod common;
use common::{fake_helm, fixtures, setup};

use chartcheck::tester::{self, Summary};
use chartcheck::{ChartTester, ErrorKind, Expectations, TestReport};

fn expectations_for(chart: &str) -> Expectations {
    let mut exp = Expectations::read_from(&fixtures().join(chart)).unwrap();
    exp.helm = fake_helm();
    exp
}

#[test]
fn full_chart_passes() {
    setup();
    let chart = fixtures().join("chart");
    let mut ct = ChartTester::new(&chart, expectations_for("chart"));
    let results = ct.run_all().to_vec();
    for r in &results {
        assert!(r.passed, "{} failed: {}", r.name, r.message);
    }
    assert_eq!(ct.summary(), Summary { total: 10, passed: 10, failed: 0 });

    let ns = &results[4];
    assert_eq!(ns.name, "Namespace Consistency");
    assert_eq!(ns.message, "Found 9 resources with correct namespace");
    assert_eq!(ns.details.as_ref().unwrap()["count"], 9);
    assert_eq!(results[5].message, "Custom namespace applied correctly");
}

#[test]
fn partial_chart_reports_what_is_missing() {
    setup();
    let chart = fixtures().join("partial-chart");
    let exp = expectations_for("partial-chart");
    assert_eq!(exp.release, "partial"); // from chartcheck.yml
    let mut ct = ChartTester::new(&chart, exp);
    ct.run_all();
    let res = ct.results();

    assert!(res[0].passed);
    assert!(!res[1].passed);
    assert!(res[1].message.starts_with("Custom values rendering failed: "));
    assert!(res[1].message.contains("tests/test-values.yaml"));
    assert_eq!(
        res[2].message,
        "Missing resources: Namespace, Deployment, StatefulSet, PersistentVolumeClaim, Secret, ConfigMap"
    );
    assert!(res[4].passed);
    assert_eq!(res[5].message, "Custom namespace not applied");
    assert_eq!(res[8].message, "Missing ports: opensearch:9200, rag-query:8000, rag-indexing:8000");
    assert_eq!(res[9].message, "Missing env vars: REACT_APP_HAYSTACK_API_URL");
    assert_eq!(ct.summary(), Summary { total: 10, passed: 2, failed: 8 });
}

#[test]
fn run_saves_results_on_failure() {
    setup();
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("test-results.json");
    let chart = fixtures().join("partial-chart");
    let err = tester::run(&chart, expectations_for("partial-chart"), &out).unwrap_err();
    match err.kind() {
        ErrorKind::TestsFailed(failed, total) => {
            assert_eq!(*failed, 8);
            assert_eq!(*total, 10);
        }
        k => panic!("unexpected error {}", k),
    }
    let rep = TestReport::load(&out).unwrap();
    assert_eq!(rep.total_tests, 10);
    assert_eq!(rep.passed_tests, 2);
    assert_eq!(rep.failed_tests, 8);
    assert_eq!(rep.chart_dir, chart.display().to_string());
    assert_eq!(rep.results[2].details.as_ref().unwrap()["missing"][0], "Namespace");
}

#[test]
fn run_succeeds_on_full_chart() {
    setup();
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("results.json");
    let sum = tester::run(&fixtures().join("chart"), expectations_for("chart"), &out).unwrap();
    assert!(sum.all_passed());

    // two space indented json
    let raw = std::fs::read_to_string(&out).unwrap();
    assert!(raw.contains("\n  \"total_tests\": 10,"));
    assert!(raw.ends_with('}'));
}

#[test]
fn invalid_expectations_never_render() {
    setup();
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("results.json");
    let mut exp = expectations_for("chart");
    exp.release = "Not A Release".into();
    let err = tester::run(&fixtures().join("chart"), exp, &out).unwrap_err();
    match err.kind() {
        ErrorKind::InvalidExpectations(_) => {}
        k => panic!("unexpected error {}", k),
    }
    assert!(!out.exists());
}

#[test]
fn cli_overrides_apply_to_chart_config() {
    setup();
    let chart = fixtures().join("partial-chart");
    let exp = Expectations::resolve(None, &chart)
        .unwrap()
        .with_overrides(Some(&fake_helm()), Some("rag.v1"));
    assert_eq!(exp.release, "rag.v1");
    assert_eq!(exp.envVars, vec!["REACT_APP_HAYSTACK_API_URL".to_string()]); // from chartcheck.yml

    // dotted release names render and still save results
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("results.json");
    assert!(tester::run(&chart, exp, &out).is_err());
    assert_eq!(TestReport::load(&out).unwrap().total_tests, 10);
}
