//! Packaging descriptor rebranding.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{RebrandError, Result};
use crate::rewrite::RewriteRule;

/// Which descriptor literals were found and replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataReport {
    pub applied: Vec<String>,
    pub missing: Vec<String>,
}

/// Rewrites the packaging descriptor at `path` with exact literal replacements.
///
/// The descriptor is never parsed. A literal that does not appear verbatim is
/// skipped with a warning, unless `strict` is set, in which case the first
/// absent literal fails with [`RebrandError::MetadataLiteralMissing`] before
/// anything is written.
pub fn rewrite_descriptor(
    path: &Path,
    rules: &[RewriteRule],
    strict: bool,
) -> Result<MetadataReport> {
    let mut contents = fs::read_to_string(path).map_err(RebrandError::io("read", path))?;
    let mut report = MetadataReport::default();

    for rule in rules {
        if contents.contains(&rule.from) {
            contents = rule.apply(&contents);
            debug!(from = %rule.from, to = %rule.to, "rewrote descriptor literal");
            report.applied.push(rule.from.clone());
        } else if strict {
            return Err(RebrandError::MetadataLiteralMissing {
                path: path.to_path_buf(),
                literal: rule.from.clone(),
            });
        } else {
            warn!(
                path = %path.display(),
                literal = %rule.from,
                "descriptor literal not found, left as is"
            );
            report.missing.push(rule.from.clone());
        }
    }

    fs::write(path, contents).map_err(RebrandError::io("write", path))?;
    Ok(report)
}
