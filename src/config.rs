//! Rebrand configuration stored in `rebrand.toml` at the repository root.

use std::fs;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{RebrandError, Result};
use crate::rewrite::RewriteRule;

/// Default file name looked up at the repository root.
pub const DEFAULT_CONFIG_FILE: &str = "rebrand.toml";

/// What to rebrand and where it comes from (TOML).
///
/// Missing fields fall back to the `analytics` → `segmentio` rebrand of
/// `segmentio/analytics-python`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RebrandConfig {
    /// Fetch URL identifying the upstream remote.
    pub upstream_url: String,

    /// Upstream default branch whose latest tag is tracked.
    pub upstream_branch: String,

    /// Long-lived branch holding the rebranded releases.
    pub release_branch: String,

    /// Remote suggested in the final `git push` hint.
    pub push_remote: String,

    /// Package directory published upstream.
    pub source_package: String,

    /// Package directory generated by the rebrand.
    pub target_package: String,

    /// Files with this suffix get their imports rewritten; others are copied.
    pub source_suffix: String,

    /// Packaging descriptor, relative to the repository root.
    pub descriptor: String,

    /// Fail instead of warning when a metadata literal is absent.
    pub strict_metadata: bool,

    pub metadata_rules: Vec<RewriteRule>,
}

impl Default for RebrandConfig {
    fn default() -> Self {
        Self {
            upstream_url: "git@github.com:segmentio/analytics-python".to_string(),
            upstream_branch: "master".to_string(),
            release_branch: "segmentio-release".to_string(),
            push_remote: "origin".to_string(),
            source_package: "analytics".to_string(),
            target_package: "segmentio".to_string(),
            source_suffix: ".py".to_string(),
            descriptor: "setup.py".to_string(),
            strict_metadata: false,
            metadata_rules: vec![
                RewriteRule::new("name='analytics-python'", "name='segmentio'"),
                RewriteRule::new(
                    "test_suite='analytics.test.all'",
                    "test_suite='segmentio.test.all'",
                ),
                RewriteRule::new(
                    "packages=['analytics', 'analytics.test']",
                    "packages=['segmentio', 'segmentio.test']",
                ),
            ],
        }
    }
}

impl RebrandConfig {
    /// Remote-tracking ref of the upstream default branch, e.g. `upstream/master`.
    pub fn upstream_ref(&self, remote: &str) -> String {
        format!("{}/{}", remote, self.upstream_branch)
    }

    pub fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: String| RebrandError::Config {
            path: path.to_path_buf(),
            message,
        };

        let required = [
            ("upstream_url", &self.upstream_url),
            ("upstream_branch", &self.upstream_branch),
            ("release_branch", &self.release_branch),
            ("push_remote", &self.push_remote),
            ("descriptor", &self.descriptor),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(invalid(format!("{key} must not be empty")));
            }
        }

        for (key, value) in [
            ("source_package", &self.source_package),
            ("target_package", &self.target_package),
        ] {
            if !is_plain_name(value) {
                return Err(invalid(format!(
                    "{key} must be a single directory name, got `{value}`"
                )));
            }
        }
        if self.source_package == self.target_package {
            return Err(invalid(
                "source_package and target_package must differ".to_string(),
            ));
        }

        if self.metadata_rules.iter().any(|r| r.from.is_empty()) {
            return Err(invalid(
                "metadata_rules entries need a non-empty `from`".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RebrandConfig::default()`.
pub fn load_config(path: &Path) -> Result<RebrandConfig> {
    let cfg = if path.exists() {
        let contents = fs::read_to_string(path).map_err(RebrandError::io("read", path))?;
        toml::from_str(&contents).map_err(|e| RebrandError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        RebrandConfig::default()
    };
    cfg.validate(path)?;
    Ok(cfg)
}
