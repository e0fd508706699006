//! Version-control collaborator.
//!
//! Every interaction with the repository goes through [`VersionControl`]. The
//! [`Git`] implementation shells out to the `git` binary in a fixed working
//! directory and turns its text output into structured values, so the rest of
//! the crate never parses git output itself.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::{debug, instrument};

use crate::error::{RebrandError, Result};
use crate::remote::{Remote, parse_remote_list};

/// Repository operations needed by a rebrand run.
pub trait VersionControl {
    /// Lists configured remotes, one entry per fetch/push URL.
    fn remotes(&self) -> Result<Vec<Remote>>;

    /// Fetches a single branch from `remote`.
    fn fetch_branch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Fetches every tag published by `remote`.
    fn fetch_tags(&self, remote: &str) -> Result<()>;

    /// Full commit id of `HEAD`.
    fn head_commit(&self) -> Result<String>;

    /// Short name of the checked out branch (`HEAD` when detached).
    fn current_branch(&self) -> Result<String>;

    fn branch_exists(&self, branch: &str) -> Result<bool>;

    fn checkout(&self, branch: &str) -> Result<()>;

    /// Most recent tag reachable from `rev`.
    fn latest_tag(&self, rev: &str) -> Result<String>;

    /// Merges `rev` without committing, taking their side on conflicting hunks.
    fn merge_preferring_theirs(&self, rev: &str) -> Result<()>;

    /// Commits every tracked modification (`git commit -am`).
    fn commit_all(&self, message: &str) -> Result<()>;

    /// Stages additions, modifications and deletions under `paths`.
    fn stage(&self, paths: &[&Path]) -> Result<()>;

    /// Commits what is staged under `paths`, leaving anything else in the index
    /// alone. Returns `Ok(false)` without committing when nothing there is staged.
    fn commit_staged(&self, message: &str, paths: &[&Path]) -> Result<bool>;

    /// Moves `HEAD`, index and working tree back to `commit`.
    fn reset_hard(&self, commit: &str) -> Result<()>;

    /// Deletes untracked files and directories under `paths`.
    fn clean(&self, paths: &[&Path]) -> Result<()>;
}

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Runs `git rev-parse <flag>` and returns its output as a trimmed string.
    ///
    /// Typically used to query repository metadata such as `--show-toplevel`.
    pub fn rev_parse(&self, flag: &str) -> Result<String> {
        self.run_output(&["rev-parse", flag])
    }

    /// Runs a git command and returns its trimmed standard output on success,
    /// or its standard error wrapped in [`RebrandError::Git`] on failure.
    fn run_output(&self, args: &[&str]) -> Result<String> {
        let out = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    /// Runs a git command and only cares whether it succeeded.
    fn run_status(&self, args: &[&str]) -> Result<()> {
        self.run_checked(args).map(|_| ())
    }

    /// Runs `git <args> -- <paths>` and returns its trimmed standard output.
    fn run_with_paths(&self, args: &[&str], paths: &[&Path]) -> Result<String> {
        let rendered: Vec<String> = paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let mut full = args.to_vec();
        full.push("--");
        full.extend(rendered.iter().map(String::as_str));
        self.run_output(&full)
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let out = self.run(args)?;
        if out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            if !stderr.trim().is_empty() {
                debug!(command = %args.join(" "), stderr = %stderr.trim(), "git stderr");
            }
            Ok(out)
        } else {
            Err(RebrandError::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            })
        }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RebrandError::Spawn {
                command: args.join(" "),
                source,
            })
    }
}

impl VersionControl for Git {
    fn remotes(&self) -> Result<Vec<Remote>> {
        let out = self.run_output(&["remote", "-v"])?;
        Ok(parse_remote_list(&out))
    }

    #[instrument(skip(self))]
    fn fetch_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.run_status(&["fetch", remote, branch])
    }

    #[instrument(skip(self))]
    fn fetch_tags(&self, remote: &str) -> Result<()> {
        self.run_status(&["fetch", "--tags", remote])
    }

    fn head_commit(&self) -> Result<String> {
        self.run_output(&["rev-parse", "--verify", "HEAD"])
    }

    fn current_branch(&self) -> Result<String> {
        self.run_output(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        let reference = format!("refs/heads/{branch}");
        let out = self.run(&["show-ref", "--verify", "--quiet", &reference])?;
        Ok(out.status.success())
    }

    #[instrument(skip(self))]
    fn checkout(&self, branch: &str) -> Result<()> {
        self.run_status(&["checkout", branch])
    }

    fn latest_tag(&self, rev: &str) -> Result<String> {
        self.run_output(&["describe", "--abbrev=0", "--tags", rev])
    }

    #[instrument(skip(self))]
    fn merge_preferring_theirs(&self, rev: &str) -> Result<()> {
        self.run_status(&["merge", "--no-ff", "--no-commit", "-X", "theirs", rev])
    }

    #[instrument(skip(self))]
    fn commit_all(&self, message: &str) -> Result<()> {
        self.run_status(&["commit", "-am", message])
    }

    fn stage(&self, paths: &[&Path]) -> Result<()> {
        self.run_with_paths(&["add", "-A"], paths).map(|_| ())
    }

    #[instrument(skip(self, paths))]
    fn commit_staged(&self, message: &str, paths: &[&Path]) -> Result<bool> {
        let staged = self.run_with_paths(&["diff", "--cached", "--name-only"], paths)?;
        if staged.is_empty() {
            debug!("no staged changes, skipping commit");
            return Ok(false);
        }
        self.run_with_paths(&["commit", "-m", message], paths)?;
        Ok(true)
    }

    #[instrument(skip(self))]
    fn reset_hard(&self, commit: &str) -> Result<()> {
        self.run_status(&["reset", "--hard", commit])
    }

    #[instrument(skip(self))]
    fn clean(&self, paths: &[&Path]) -> Result<()> {
        self.run_with_paths(&["clean", "-fdq"], paths).map(|_| ())
    }
}
