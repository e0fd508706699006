//! Upstream vs. local tag comparison.

use tracing::{debug, info};

use crate::error::Result;
use crate::git::VersionControl;

/// Result of comparing the release branch against upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagComparison {
    /// Latest tag reachable from the checked out release branch.
    pub current: String,
    /// Latest tag reachable from the upstream default branch.
    pub latest: String,
}

impl TagComparison {
    /// Tags are opaque labels; equal strings mean nothing new was released.
    pub fn up_to_date(&self) -> bool {
        self.current == self.latest
    }
}

/// Describes `HEAD` and `upstream_ref` and compares the resulting tags.
pub fn compare_tags<V: VersionControl>(vcs: &V, upstream_ref: &str) -> Result<TagComparison> {
    let latest = vcs.latest_tag(upstream_ref)?;
    let current = vcs.latest_tag("HEAD")?;

    debug!(current_local_tag = %current, most_recent_tag = %latest, "described tags");

    let comparison = TagComparison { current, latest };
    if comparison.up_to_date() {
        info!(tag = %comparison.latest, "version up to date with upstream release");
    }
    Ok(comparison)
}
