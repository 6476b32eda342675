#![allow(non_snake_case)]

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use regex::Regex;

use super::{ErrorKind, Result, ResultExt};

/// Name of the optional expectations file looked up in the chart directory
pub const CONFIG_FILE: &str = "chartcheck.yml";

/// A port a named service is expected to expose
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PortExpectation {
    /// Service the port belongs to (only used for reporting)
    pub service: String,
    /// Port, matched as `port: {port}`; numbers and strings are both accepted
    #[serde(deserialize_with = "crate::relaxed_string::deserialize")]
    pub port: String,
}

impl PortExpectation {
    pub fn new(service: &str, port: impl ToString) -> Self {
        PortExpectation { service: service.into(), port: port.to_string() }
    }
}

/// Everything a rendered chart is checked against
///
/// Serializable from `chartcheck.yml`. Every key is optional and falls back
/// to the values for the haystack rag chart this harness was written for.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Expectations {
    /// Release name passed to `helm template`
    pub release: String,
    /// Helm binary to invoke
    pub helm: String,
    /// Values file for the default render, relative to the chart
    pub valuesFile: String,
    /// Values file for the custom render, relative to the chart
    pub customValuesFile: String,

    /// Resource kinds that must appear as `kind: {kind}`
    pub requiredKinds: Vec<String>,
    /// Resource names that must appear as `name: {name}`
    pub resourceNames: Vec<String>,
    /// Namespace the default render puts resources in
    pub namespace: String,
    /// Namespace the custom values file switches to
    pub customNamespace: String,
    /// Services whose `app: {svc}` selector must appear
    pub selectors: Vec<String>,
    /// Fully qualified image references
    pub images: Vec<String>,
    /// Service ports
    pub ports: Vec<PortExpectation>,
    /// Environment variable names
    pub envVars: Vec<String>,
}

impl Default for Expectations {
    fn default() -> Self {
        let strs = |xs: &[&str]| xs.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        Expectations {
            release: "test-release".into(),
            helm: "helm".into(),
            valuesFile: "values.yaml".into(),
            customValuesFile: "tests/test-values.yaml".into(),
            requiredKinds: strs(&[
                "Namespace",
                "Deployment",
                "Service",
                "StatefulSet",
                "PersistentVolumeClaim",
                "Secret",
                "ConfigMap",
            ]),
            resourceNames: strs(&[
                "rag-frontend",
                "rag-query",
                "rag-indexing",
                "opensearch",
                "rag-secrets",
                "rag-config",
            ]),
            namespace: "haystack-rag".into(),
            customNamespace: "test-namespace".into(),
            selectors: strs(&["rag-frontend", "rag-query", "rag-indexing", "opensearch"]),
            images: strs(&[
                "public.ecr.aws/e8b9x6t1/haystack-frontend:0.1.0",
                "opensearchproject/opensearch:2.18.0",
            ]),
            ports: vec![
                PortExpectation::new("opensearch", 9200),
                PortExpectation::new("rag-frontend", 80),
                PortExpectation::new("rag-query", 8000),
                PortExpectation::new("rag-indexing", 8000),
            ],
            envVars: strs(&["REACT_APP_HAYSTACK_API_URL", "OPENSEARCH_HOST", "OPENSEARCH_PORT"]),
        }
    }
}

impl Expectations {
    /// Read expectations from a chart directory
    ///
    /// A chart without a `chartcheck.yml` gets the defaults.
    pub fn read_from(chart_dir: &Path) -> Result<Expectations> {
        let cpath = chart_dir.join(CONFIG_FILE);
        if !cpath.exists() {
            debug!("No {} in {}, using defaults", CONFIG_FILE, chart_dir.display());
            return Ok(Expectations::default());
        }
        Expectations::read_file(&cpath)
    }

    /// Expectations from an explicit config file, or the chart directory
    pub fn resolve(config: Option<&Path>, chart_dir: &Path) -> Result<Expectations> {
        match config {
            Some(c) => Expectations::read_file(c),
            None => Expectations::read_from(chart_dir),
        }
    }

    /// Apply command line overrides for the helm binary and release name
    pub fn with_overrides(mut self, helm: Option<&str>, release: Option<&str>) -> Expectations {
        if let Some(h) = helm {
            self.helm = h.into();
        }
        if let Some(r) = release {
            self.release = r.into();
        }
        self
    }

    /// Read expectations from an explicit file that must exist
    pub fn read_file(cpath: &Path) -> Result<Expectations> {
        trace!("Using config in {}", cpath.display());
        if !cpath.exists() {
            bail!(ErrorKind::MissingConfig(cpath.display().to_string()));
        }
        let mut f = File::open(cpath)?;
        let mut data = String::new();
        f.read_to_string(&mut data)?;
        Expectations::parse(&data).chain_err(|| format!("failed to parse {}", cpath.display()))
    }

    /// Parse expectations from yaml
    ///
    /// An empty document is treated as all defaults.
    pub fn parse(data: &str) -> Result<Expectations> {
        if data.trim().is_empty() {
            return Ok(Expectations::default());
        }
        let exp: Expectations = serde_yaml::from_str(data)?;
        Ok(exp)
    }

    /// Sanity check values that would make every render fail
    pub fn verify(&self) -> Result<()> {
        // helm release names are dns-1123 subdomains capped at 53 chars
        let release_re =
            Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$").unwrap();
        if !release_re.is_match(&self.release) || self.release.len() > 53 {
            bail!(ErrorKind::InvalidExpectations(format!("invalid release name '{}'", self.release)));
        }
        if self.helm.trim().is_empty() {
            bail!(ErrorKind::InvalidExpectations("helm binary cannot be empty".into()));
        }
        if self.valuesFile.trim().is_empty() || self.customValuesFile.trim().is_empty() {
            bail!(ErrorKind::InvalidExpectations("values files cannot be empty".into()));
        }
        if self.namespace.trim().is_empty() || self.customNamespace.trim().is_empty() {
            bail!(ErrorKind::InvalidExpectations("namespaces cannot be empty".into()));
        }
        Ok(())
    }
}
