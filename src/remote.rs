//! Upstream remote discovery.

use tracing::debug;

use crate::error::{RebrandError, Result};
use crate::git::VersionControl;

/// Which side of a remote a URL is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Fetch,
    Push,
}

/// One line of `git remote -v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
    pub direction: Direction,
}

/// Parses `git remote -v` output (`<name>\t<url> (fetch|push)` per line).
///
/// Lines that don't follow that shape are ignored.
pub(crate) fn parse_remote_list(out: &str) -> Vec<Remote> {
    out.lines().filter_map(parse_remote_line).collect()
}

fn parse_remote_line(line: &str) -> Option<Remote> {
    let (name, rest) = line.split_once('\t')?;
    let (url, direction) = rest.trim_end().rsplit_once(' ')?;
    let direction = match direction {
        "(fetch)" => Direction::Fetch,
        "(push)" => Direction::Push,
        _ => return None,
    };
    Some(Remote {
        name: name.to_string(),
        url: url.to_string(),
        direction,
    })
}

/// True when `url` is `upstream_url`, optionally followed by `.git`.
fn url_matches(url: &str, upstream_url: &str) -> bool {
    url == upstream_url || url.strip_suffix(".git") == Some(upstream_url)
}

/// Picks the first remote whose fetch URL matches `upstream_url`.
pub fn find_upstream(remotes: &[Remote], upstream_url: &str) -> Result<Remote> {
    remotes
        .iter()
        .find(|r| r.direction == Direction::Fetch && url_matches(&r.url, upstream_url))
        .cloned()
        .ok_or_else(|| RebrandError::RemoteNotFound {
            pattern: upstream_url.to_string(),
        })
}

/// Lists the repository's remotes and resolves the upstream one.
pub fn resolve_upstream<V: VersionControl>(vcs: &V, upstream_url: &str) -> Result<Remote> {
    let remote = find_upstream(&vcs.remotes()?, upstream_url)?;
    debug!(name = %remote.name, url = %remote.url, "resolved upstream remote");
    Ok(remote)
}
