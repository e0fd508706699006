//! Namespace rewriting: mirror the upstream package under the new name.
//!
//! The source package directory is copied into the target package directory
//! entry by entry. Files carrying the source suffix have their import
//! statements rewritten from the old namespace to the new one; every other
//! file is copied byte-for-byte.
//!
//! Rewrites are literal substring replacements, not a parse of the source
//! language, so matching text inside comments or strings is rewritten as well.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RebrandError, Result};

/// A literal `from` → `to` substring replacement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

impl RewriteRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.from, &self.to)
    }
}

/// Applies `rules` in order.
pub fn apply_rules(rules: &[RewriteRule], text: &str) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

/// The two import rewrites moving code from namespace `old` to `new`:
/// `import old` and `from old.`.
pub fn namespace_rules(old: &str, new: &str) -> Vec<RewriteRule> {
    vec![
        RewriteRule::new(format!("import {old}"), format!("import {new}")),
        RewriteRule::new(format!("from {old}."), format!("from {new}.")),
    ]
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Written with different content than the source.
    Refactored,
    /// Written with the same bytes as the source.
    Copied,
}

impl FileAction {
    fn label(self) -> &'static str {
        match self {
            FileAction::Refactored => "refactored",
            FileAction::Copied => "copied",
        }
    }
}

/// Paths (relative to the package roots) touched by a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub directories: Vec<PathBuf>,
    pub refactored: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
}

impl RewriteReport {
    pub fn files(&self) -> usize {
        self.refactored.len() + self.copied.len()
    }

    fn record(&mut self, rel: PathBuf, action: FileAction) {
        match action {
            FileAction::Refactored => self.refactored.push(rel),
            FileAction::Copied => self.copied.push(rel),
        }
    }
}

/// Removes `target` if it is a directory, then creates it empty.
///
/// Guarantees nothing from a previous generation survives into the next one.
pub fn rebuild_target(target: &Path) -> Result<()> {
    if target.is_dir() {
        fs::remove_dir_all(target).map_err(RebrandError::io("remove", target))?;
    }
    fs::create_dir_all(target).map_err(RebrandError::io("create", target))
}

/// Mirrors a source package tree into a target package tree.
#[derive(Debug, Clone)]
pub struct NamespaceRewriter {
    source_root: PathBuf,
    target_root: PathBuf,
    suffix: String,
    rules: Vec<RewriteRule>,
}

impl NamespaceRewriter {
    /// # Parameters
    ///
    /// * `source_root` – Existing package directory to read from.
    /// * `target_root` – Directory to write into; must exist.
    /// * `suffix` – File name suffix of files whose content gets rewritten.
    /// * `rules` – Replacements applied to those files.
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        suffix: impl Into<String>,
        rules: Vec<RewriteRule>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            suffix: suffix.into(),
            rules,
        }
    }

    /// Walks the whole source tree and writes its rebranded copy.
    pub fn rewrite(&self) -> Result<RewriteReport> {
        let mut report = RewriteReport::default();
        self.mirror_dir(Path::new(""), &mut report)?;
        Ok(report)
    }

    fn mirror_dir(&self, rel: &Path, report: &mut RewriteReport) -> Result<()> {
        let dir = self.source_root.join(rel);
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(RebrandError::io("list", &dir))? {
            let entry = entry.map_err(RebrandError::io("list", &dir))?;
            let name = entry.file_name();
            // Hidden entries (editor swap files, .DS_Store, ...) are not part of the package.
            if name.to_string_lossy().starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();

        for name in names {
            let rel_child = rel.join(&name);
            let src = self.source_root.join(&rel_child);
            let dest = self.target_root.join(&rel_child);

            if src.is_dir() {
                fs::create_dir(&dest).map_err(RebrandError::io("create", &dest))?;
                report.directories.push(rel_child.clone());
                self.mirror_dir(&rel_child, report)?;
                continue;
            }

            let action = if name.to_string_lossy().ends_with(&self.suffix) {
                self.rewrite_file(&src, &dest)?
            } else {
                fs::copy(&src, &dest).map_err(RebrandError::io("copy", &src))?;
                FileAction::Copied
            };
            debug!(
                "{:>12} file  src:{} dest:{}",
                action.label(),
                src.display(),
                dest.display()
            );
            report.record(rel_child, action);
        }
        Ok(())
    }

    fn rewrite_file(&self, src: &Path, dest: &Path) -> Result<FileAction> {
        let bytes = fs::read(src).map_err(RebrandError::io("read", src))?;
        let original = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %src.display(), "source file is not UTF-8, copying unchanged");
                fs::write(dest, e.as_bytes()).map_err(RebrandError::io("write", dest))?;
                return Ok(FileAction::Copied);
            }
        };

        let rewritten = apply_rules(&self.rules, &original);
        fs::write(dest, &rewritten).map_err(RebrandError::io("write", dest))?;

        if rewritten == original {
            Ok(FileAction::Copied)
        } else {
            Ok(FileAction::Refactored)
        }
    }
}
