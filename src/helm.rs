use std::path::Path;
use std::process::Command;

use super::Result;

/// Outcome of a `helm template` call
#[derive(Clone, Debug, PartialEq)]
pub enum Rendered {
    /// Rendered manifests from stdout
    Ok(String),
    /// Stderr of a failed render, or the reason helm could not be started
    Failed(String),
}

impl Rendered {
    pub fn is_ok(&self) -> bool {
        match self {
            Rendered::Ok(_) => true,
            Rendered::Failed(_) => false,
        }
    }

    /// Rendered text, empty when the render failed
    pub fn text(&self) -> &str {
        match self {
            Rendered::Ok(s) => s,
            Rendered::Failed(_) => "",
        }
    }
}

/// Run helm in a directory and capture its output
///
/// Returns stdout, stderr, and whether helm exited successfully.
pub fn hout(helm: &str, args: Vec<String>, cwd: &Path) -> Result<(String, String, bool)> {
    debug!("{} {}", helm, args.join(" "));
    let s = Command::new(helm).args(&args).current_dir(cwd).output()?;
    let out: String = String::from_utf8_lossy(&s.stdout).into();
    let err: String = String::from_utf8_lossy(&s.stderr).into();
    Ok((out, err, s.status.success()))
}

/// Render the chart in `chart_dir` with a values file
///
/// Equivalent to `helm template {release} . -f {values}` from inside the chart.
/// Never errors: a helm that cannot be spawned is reported as a failed render.
pub fn template(helm: &str, chart_dir: &Path, release: &str, values: &str) -> Rendered {
    let tplvec = vec![
        "template".into(),
        release.into(),
        ".".into(),
        "-f".into(),
        values.into(),
    ];
    match hout(helm, tplvec.clone(), chart_dir) {
        Ok((tpl, _, true)) => Rendered::Ok(tpl),
        Ok((_, tplerr, false)) => {
            warn!("{} {} stderr: {}", helm, tplvec.join(" "), tplerr.trim_end());
            Rendered::Failed(tplerr)
        }
        Err(e) => {
            warn!("failed to run {} in {}: {}", helm, chart_dir.display(), e);
            Rendered::Failed(e.to_string())
        }
    }
}
