use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every way a rebrand run can fail.
///
/// `Setup` and `RemoteNotFound` are raised before anything is mutated and ask
/// the operator to fix the checkout. Everything else is propagated from a git
/// command or a filesystem step and, once the merge has started, triggers a
/// reset to the starting commit.
#[derive(Debug, Error)]
pub enum RebrandError {
    #[error(
        "release branch `{branch}` does not exist\n run `git checkout -b {branch} tags/{tag}` to create it\n then make sure your rebrand config is committed on it"
    )]
    Setup { branch: String, tag: String },

    #[error("could not find a remote fetching from `{pattern}`")]
    RemoteNotFound { pattern: String },

    #[error("`git {command}` failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("failed to run `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("{} does not contain `{literal}`", path.display())]
    MetadataLiteralMissing { path: PathBuf, literal: String },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("`git` not found in PATH")]
    GitNotFound,
}

impl RebrandError {
    /// Builds a `map_err` adapter that tags an I/O failure with the action and path.
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(io::Error) -> RebrandError {
        let path = path.into();
        move |source| RebrandError::Io {
            action,
            path,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RebrandError>;
