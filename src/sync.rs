//! Fetching from upstream and merging tagged releases.

use tracing::info;

use crate::error::Result;
use crate::git::VersionControl;
use crate::remote::Remote;

/// Fetches the upstream default branch, then every upstream tag.
pub fn fetch_upstream<V: VersionControl>(vcs: &V, remote: &Remote, branch: &str) -> Result<()> {
    info!(remote = %remote.name, url = %remote.url, branch, "fetching upstream");
    vcs.fetch_branch(&remote.name, branch)?;
    vcs.fetch_tags(&remote.name)
}

/// Commit message recorded for a merged upstream release.
pub fn merge_message(tag: &str) -> String {
    format!("merged Release {tag}")
}

/// Merges `tags/<tag>` into the current branch, preferring upstream content on
/// conflict, and commits the result.
pub fn merge_tag<V: VersionControl>(vcs: &V, tag: &str) -> Result<()> {
    info!(tag, "merging tagged release");
    vcs.merge_preferring_theirs(&format!("tags/{tag}"))?;
    vcs.commit_all(&merge_message(tag))
}
