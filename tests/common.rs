#![allow(dead_code)]

use std::{env, path::PathBuf, sync::Once};

static START: Once = Once::new();

/// Directory of test fixtures
///
/// Provides a fake helm that echoes the values file, and charts whose values files are pre-rendered output.
pub fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Path to the fake helm binary
pub fn fake_helm() -> String {
    fixtures().join("bin").join("helm").display().to_string()
}

pub fn setup() {
    START.call_once(|| {
        let helm = fixtures().join("bin").join("helm");
        // checkouts do not always keep the executable bit
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&helm).unwrap().permissions();
            if perms.mode() & 0o111 == 0 {
                perms.set_mode(0o755);
                std::fs::set_permissions(&helm, perms).unwrap();
            }
        }
        env::remove_var("CHARTCHECK_CHART_DIR");
        println!("Initializing tests - using fixtures {}", fixtures().display());
    });
}
