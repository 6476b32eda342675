#![recursion_limit = "1024"]

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;

#[macro_use]
extern crate log;

#[macro_use]
extern crate error_chain;
error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }
    links {}
    foreign_links {
        Fmt(::std::fmt::Error);
        Io(::std::io::Error);
        SerdeY(serde_yaml::Error);
        SerdeJ(serde_json::Error);
    }
    errors {
        MissingConfig(path: String) {
            description("config file does not exist")
            display("config file {} does not exist", &path)
        }
        InvalidExpectations(reason: String) {
            description("expectations do not validate")
            display("invalid expectations: {}", &reason)
        }
        ChartDirMissing(path: String) {
            description("chart directory does not exist")
            display("chart directory {} does not exist", &path)
        }
        TestsFailed(failed: usize, total: usize) {
            description("chart tests failed")
            display("{} of {} chart tests failed", failed, total)
        }
    }
}

/// Expectations a rendered chart is checked against
pub mod config;
pub use crate::config::Expectations;

/// A small CLI helm interface
pub mod helm;

/// Substring assertions over rendered manifests
pub mod checks;

/// Results document serialized to json
pub mod results;
pub use crate::results::{TestReport, TestResult};

/// The suite runner
pub mod tester;
pub use crate::tester::ChartTester;

/// JUnit xml generation from a results document
pub mod report;

/// Serde helper for fields that take numbers or strings
pub mod relaxed_string;

use std::path::PathBuf;

/// Environment variable naming the default chart directory
pub const CHART_DIR_ENV: &str = "CHARTCHECK_CHART_DIR";

/// Pick the chart directory from an explicit path, then the environment, then pwd
///
/// Only the chosen directory is validated, so an explicit path overrides a stale environment.
pub fn chart_dir(explicit: Option<&str>, from_env: Option<String>) -> Result<PathBuf> {
    let cdir = match (explicit, from_env) {
        (Some(d), _) => d.to_string(),
        (None, Some(d)) => {
            debug!("Using chart directory {} from {}", d, CHART_DIR_ENV);
            d
        }
        (None, None) => ".".to_string(),
    };
    let pth = PathBuf::from(&cdir);
    if !pth.is_dir() {
        bail!(ErrorKind::ChartDirMissing(cdir));
    }
    Ok(pth)
}

/// Resolve the chart directory against the real environment
pub fn resolve_chart_dir(explicit: Option<&str>) -> Result<PathBuf> {
    chart_dir(explicit, std::env::var(CHART_DIR_ENV).ok())
}

#[cfg(test)]
mod tests {
    use super::{chart_dir, ErrorKind};
    use std::path::PathBuf;

    #[test]
    fn chart_dir_precedence() {
        let tmp = tempfile::tempdir().unwrap();
        let t = tmp.path().display().to_string();
        assert_eq!(chart_dir(None, None).unwrap(), PathBuf::from("."));
        assert_eq!(chart_dir(None, Some(t.clone())).unwrap(), PathBuf::from(&t));
        assert_eq!(chart_dir(Some(&t), Some(".".into())).unwrap(), PathBuf::from(&t));
    }

    #[test]
    fn explicit_dir_beats_stale_env() {
        let tmp = tempfile::tempdir().unwrap();
        let t = tmp.path().display().to_string();
        assert!(chart_dir(Some(&t), Some("/nope/chart".into())).is_ok());
    }

    #[test]
    fn missing_chart_dir() {
        let err = chart_dir(None, Some("/nope/chart".into())).unwrap_err();
        match err.kind() {
            ErrorKind::ChartDirMissing(p) => assert_eq!(p, "/nope/chart"),
            k => panic!("unexpected error {}", k),
        }
        assert!(chart_dir(Some("/nope/other"), None).is_err());
    }
}
