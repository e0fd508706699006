//! Test-only scripted stand-ins for the repository and the prompt.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{RebrandError, Result};
use crate::git::VersionControl;
use crate::prompt::ConfirmPrompter;
use crate::remote::{Direction, Remote};

/// In-memory repository that records every call as a short git-like string.
pub struct ScriptedVcs {
    pub remotes: Vec<Remote>,
    pub branches: Vec<String>,
    pub current: RefCell<String>,
    /// `rev` → tag returned by `latest_tag`.
    pub tags: HashMap<String, String>,
    pub head: String,
    /// Any call whose rendering starts with one of these prefixes fails.
    pub fail_on: Vec<String>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedVcs {
    pub fn new() -> Self {
        Self {
            remotes: vec![
                remote("origin", "git@github.com:acme/segmentio-python.git", Direction::Fetch),
                remote(
                    "segment",
                    "git@github.com:segmentio/analytics-python",
                    Direction::Fetch,
                ),
            ],
            branches: vec!["master".to_string(), "segmentio-release".to_string()],
            current: RefCell::new("master".to_string()),
            tags: HashMap::new(),
            head: "0123abcd".to_string(),
            fail_on: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_tags(mut self, head: &str, upstream: &str) -> Self {
        self.tags.insert("HEAD".to_string(), head.to_string());
        self.tags
            .insert("segment/master".to_string(), upstream.to_string());
        self
    }

    pub fn failing_on(mut self, prefix: &str) -> Self {
        self.fail_on.push(prefix.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, call: String) -> Result<()> {
        let fails = self.fail_on.iter().any(|prefix| call.starts_with(prefix));
        self.calls.borrow_mut().push(call.clone());
        if fails {
            return Err(RebrandError::Git {
                command: call,
                stderr: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

pub fn remote(name: &str, url: &str, direction: Direction) -> Remote {
    Remote {
        name: name.to_string(),
        url: url.to_string(),
        direction,
    }
}

fn render(paths: &[&Path]) -> String {
    let rendered: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    rendered.join(" ")
}

impl VersionControl for ScriptedVcs {
    fn remotes(&self) -> Result<Vec<Remote>> {
        Ok(self.remotes.clone())
    }

    fn fetch_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("fetch {remote} {branch}"))
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        self.record(format!("fetch --tags {remote}"))
    }

    fn head_commit(&self) -> Result<String> {
        Ok(self.head.clone())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.current.borrow().clone())
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        Ok(self.branches.iter().any(|b| b == branch))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout {branch}"))?;
        *self.current.borrow_mut() = branch.to_string();
        Ok(())
    }

    fn latest_tag(&self, rev: &str) -> Result<String> {
        self.tags.get(rev).cloned().ok_or_else(|| RebrandError::Git {
            command: format!("describe --abbrev=0 --tags {rev}"),
            stderr: "fatal: No names found".to_string(),
        })
    }

    fn merge_preferring_theirs(&self, rev: &str) -> Result<()> {
        self.record(format!("merge {rev}"))
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.record(format!("commit -am {message}"))
    }

    fn stage(&self, paths: &[&Path]) -> Result<()> {
        self.record(format!("add {}", render(paths)))
    }

    fn commit_staged(&self, message: &str, paths: &[&Path]) -> Result<bool> {
        self.record(format!("commit -m {message} -- {}", render(paths)))?;
        Ok(true)
    }

    fn reset_hard(&self, commit: &str) -> Result<()> {
        self.record(format!("reset --hard {commit}"))
    }

    fn clean(&self, paths: &[&Path]) -> Result<()> {
        self.record(format!("clean {}", render(paths)))
    }
}

/// Confirm prompter that answers from a script and counts how often it was asked.
pub struct ScriptedConfirm {
    pub response: std::result::Result<bool, String>,
    pub asked: usize,
}

impl ScriptedConfirm {
    pub fn answering(response: bool) -> Self {
        Self {
            response: Ok(response),
            asked: 0,
        }
    }
}

impl ConfirmPrompter for ScriptedConfirm {
    fn confirm(&mut self, _prompt: &str, _default: bool) -> std::result::Result<bool, String> {
        self.asked += 1;
        self.response.clone()
    }
}
