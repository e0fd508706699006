//! The release workflow: sync with upstream, merge, regenerate, commit.
//!
//! Steps run strictly in order. Nothing before the merge mutates history, so
//! those failures simply propagate. From the merge onwards any failure resets
//! the release branch to the commit recorded before the fetch and removes
//! untracked files left in the generated package, then surfaces the original
//! error, so the checkout is never left half-renamed.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::branch::ensure_release_branch;
use crate::config::RebrandConfig;
use crate::error::{RebrandError, Result};
use crate::git::VersionControl;
use crate::metadata::{MetadataReport, rewrite_descriptor};
use crate::prompt::{ConfirmPrompter, confirm_merge};
use crate::remote::resolve_upstream;
use crate::rewrite::{NamespaceRewriter, RewriteReport, namespace_rules, rebuild_target};
use crate::sync::{fetch_upstream, merge_tag};
use crate::tags::compare_tags;

/// Per-invocation switches coming from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Regenerate the package from the current release branch without
    /// checking for or merging a new upstream release.
    pub skip_release_merge: bool,
}

/// A generated release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag: String,
    pub rewrite: RewriteReport,
    pub metadata: MetadataReport,
    /// False when regeneration produced no change to commit.
    pub committed: bool,
}

/// How a run ended, when it didn't fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The release branch already carries the latest upstream tag.
    UpToDate { tag: String },
    /// The operator refused to merge `tag`.
    Declined { tag: String },
    Released(Release),
}

/// Commit message for the generated package.
pub fn release_message(target_package: &str) -> String {
    format!("created {target_package} release")
}

/// Drives one rebrand run against the repository checked out at `root`.
///
/// # Parameters
///
/// * `vcs` – Repository collaborator, rooted at `root`.
/// * `root` – Repository working tree; package and descriptor paths are relative to it.
/// * `config` – What to rebrand.
/// * `options` – Command-line switches.
/// * `prompter` – Asked before an upstream release is merged.
///
/// # Errors
///
/// * [`RebrandError::RemoteNotFound`] / [`RebrandError::Setup`] before anything changes.
/// * Any git or filesystem failure; failures from the merge onwards are
///   returned after resetting to the starting commit.
pub fn run<V, P>(
    vcs: &V,
    root: &Path,
    config: &RebrandConfig,
    options: RunOptions,
    prompter: &mut P,
) -> Result<RunOutcome>
where
    V: VersionControl,
    P: ConfirmPrompter + ?Sized,
{
    info!(url = %config.upstream_url, "resolving upstream remote");
    let remote = resolve_upstream(vcs, &config.upstream_url)?;
    let upstream_ref = config.upstream_ref(&remote.name);

    info!(branch = %config.release_branch, "checking out release branch");
    ensure_release_branch(vcs, &config.release_branch, &upstream_ref)?;

    let starting_commit = vcs.head_commit()?;
    info!(
        starting_commit = %starting_commit,
        "if anything goes wrong revert to the current state with `git reset --hard {starting_commit}`"
    );

    fetch_upstream(vcs, &remote, &config.upstream_branch)?;

    info!("extracting most recent tags");
    let tags = compare_tags(vcs, &upstream_ref)?;

    let merge = if options.skip_release_merge {
        info!("skipping release merge");
        None
    } else {
        if tags.up_to_date() {
            return Ok(RunOutcome::UpToDate { tag: tags.latest });
        }
        let confirmed =
            confirm_merge(prompter, &tags.latest, &tags.current, &config.release_branch)
                .map_err(RebrandError::Prompt)?;
        if !confirmed {
            info!(tag = %tags.latest, "merge declined, nothing changed");
            return Ok(RunOutcome::Declined { tag: tags.latest });
        }
        Some(tags.latest.as_str())
    };

    let tag = merge.unwrap_or(tags.current.as_str()).to_string();
    match build_release(vcs, root, config, merge) {
        Ok((rewrite, metadata, committed)) => {
            info!(tag = %tag, "successfully created {} release {}", config.target_package, tag);
            Ok(RunOutcome::Released(Release {
                tag,
                rewrite,
                metadata,
                committed,
            }))
        }
        Err(err) => {
            error!(
                starting_commit = %starting_commit,
                error = %err,
                "whoops, resetting to the starting commit"
            );
            if let Err(reset_err) = vcs.reset_hard(&starting_commit) {
                error!(
                    error = %reset_err,
                    "reset failed, run `git reset --hard {starting_commit}` yourself"
                );
            }
            let target = Path::new(&config.target_package);
            if let Err(clean_err) = vcs.clean(&[target]) {
                error!(
                    error = %clean_err,
                    "clean failed, run `git clean -fd -- {}` yourself",
                    config.target_package
                );
            }
            Err(err)
        }
    }
}

/// Everything from the merge to the final commit; any error here is rolled back.
fn build_release<V: VersionControl>(
    vcs: &V,
    root: &Path,
    config: &RebrandConfig,
    merge: Option<&str>,
) -> Result<(RewriteReport, MetadataReport, bool)> {
    if let Some(tag) = merge {
        merge_tag(vcs, tag)?;
    }

    let source: PathBuf = root.join(&config.source_package);
    let target: PathBuf = root.join(&config.target_package);

    info!(target = %target.display(), "clobbering generated package");
    rebuild_target(&target)?;

    info!(
        from = %config.source_package,
        to = %config.target_package,
        "generating package"
    );
    let rewriter = NamespaceRewriter::new(
        source,
        &target,
        config.source_suffix.as_str(),
        namespace_rules(&config.source_package, &config.target_package),
    );
    let rewrite = rewriter.rewrite()?;
    info!(
        refactored = rewrite.refactored.len(),
        copied = rewrite.copied.len(),
        "package generated"
    );

    info!(descriptor = %config.descriptor, "rewriting packaging metadata");
    let metadata = rewrite_descriptor(
        &root.join(&config.descriptor),
        &config.metadata_rules,
        config.strict_metadata,
    )?;

    info!("committing generated package");
    let generated = [
        Path::new(&config.target_package),
        Path::new(&config.descriptor),
    ];
    vcs.stage(&generated)?;
    let committed = vcs.commit_staged(&release_message(&config.target_package), &generated)?;
    if !committed {
        info!("generated package unchanged, nothing to commit");
    }

    Ok((rewrite, metadata, committed))
}
