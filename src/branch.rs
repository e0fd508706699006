//! Release branch guard.

use tracing::{debug, info};

use crate::error::{RebrandError, Result};
use crate::git::VersionControl;

/// Placeholder shown in the setup hint when no upstream tag can be described.
const UNKNOWN_TAG: &str = "<tag>";

/// Makes sure the release branch is checked out.
///
/// The branch is never created here: if it is missing the operator gets a
/// [`RebrandError::Setup`] explaining how to create it from an upstream tag,
/// and nothing is touched.
///
/// # Parameters
///
/// * `vcs` – Repository to inspect.
/// * `release_branch` – Branch that holds the rebranded releases.
/// * `upstream_ref` – Ref whose latest tag is suggested as the branch point.
pub fn ensure_release_branch<V: VersionControl>(
    vcs: &V,
    release_branch: &str,
    upstream_ref: &str,
) -> Result<()> {
    let current = vcs.current_branch()?;
    if current == release_branch {
        debug!(branch = release_branch, "already on release branch");
        return Ok(());
    }

    if !vcs.branch_exists(release_branch)? {
        let tag = vcs
            .latest_tag(upstream_ref)
            .unwrap_or_else(|_| UNKNOWN_TAG.to_string());
        return Err(RebrandError::Setup {
            branch: release_branch.to_string(),
            tag,
        });
    }

    info!(from = %current, to = release_branch, "switching to release branch");
    vcs.checkout(release_branch)
}
