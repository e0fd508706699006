//! End-to-end runs against real git repositories.
//!
//! Each test builds an "upstream" repository publishing an `analytics`
//! package, clones it into a working checkout, and drives
//! `workflow::run` there. Tests return early when `git` is not installed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use rebrand_release::config::RebrandConfig;
use rebrand_release::error::RebrandError;
use rebrand_release::git::Git;
use rebrand_release::prompt::AssumeYes;
use rebrand_release::workflow::{self, RunOptions, RunOutcome};

const SETUP_PY: &str = "\
from setuptools import setup

setup(
    name='analytics-python',
    version='1.3.0',
    test_suite='analytics.test.all',
    packages=['analytics', 'analytics.test'],
)
";

fn git(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("spawn git");
    assert!(
        out.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.name", "Release Bot"]);
    git(dir, &["config", "user.email", "release@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write");
}

/// Upstream repository plus a clone with a `segmentio-release` branch cut at `v1.3.0`.
struct Fixture {
    _dir: tempfile::TempDir,
    upstream: PathBuf,
    work: PathBuf,
    config: RebrandConfig,
}

impl Fixture {
    fn new(create_release_branch: bool) -> Option<Self> {
        if which::which("git").is_err() {
            return None;
        }
        let dir = tempfile::tempdir().expect("tempdir");
        let upstream = dir.path().join("upstream");
        let work = dir.path().join("work");
        fs::create_dir(&upstream).expect("mkdir");

        git(&upstream, &["init", "--quiet"]);
        git(&upstream, &["symbolic-ref", "HEAD", "refs/heads/master"]);
        configure_identity(&upstream);
        write(
            &upstream,
            "analytics/__init__.py",
            "from analytics.client import Client\n",
        );
        write(
            &upstream,
            "analytics/client.py",
            "import analytics\n\nclass Client(object):\n    pass\n",
        );
        write(&upstream, "analytics/old_module.py", "OLD = True\n");
        write(
            &upstream,
            "analytics/test/__init__.py",
            "from analytics.test.client import TestClient\n",
        );
        write(&upstream, "setup.py", SETUP_PY);
        git(&upstream, &["add", "-A"]);
        git(&upstream, &["commit", "--quiet", "-m", "release 1.3.0"]);
        git(&upstream, &["tag", "v1.3.0"]);

        let upstream_url = upstream.to_string_lossy().into_owned();
        git(
            dir.path(),
            &["clone", "--quiet", &upstream_url, &work.to_string_lossy()],
        );
        configure_identity(&work);
        if create_release_branch {
            git(&work, &["checkout", "--quiet", "-b", "segmentio-release", "tags/v1.3.0"]);
            git(&work, &["checkout", "--quiet", "master"]);
        }

        let config = RebrandConfig {
            upstream_url,
            ..RebrandConfig::default()
        };
        Some(Self {
            _dir: dir,
            upstream,
            work,
            config,
        })
    }

    /// Publishes `v1.4.0` upstream: edits a module, drops one and adds one.
    fn publish_v1_4_0(&self) {
        write(
            &self.upstream,
            "analytics/client.py",
            "import analytics\nimport json\n\nclass Client(object):\n    timeout = 10\n",
        );
        fs::remove_file(self.upstream.join("analytics/old_module.py")).expect("remove");
        write(
            &self.upstream,
            "analytics/batch.py",
            "from analytics.client import Client\n",
        );
        git(&self.upstream, &["add", "-A"]);
        git(&self.upstream, &["commit", "--quiet", "-m", "release 1.4.0"]);
        git(&self.upstream, &["tag", "v1.4.0"]);
    }

    fn run(&self, options: RunOptions) -> Result<RunOutcome, RebrandError> {
        workflow::run(
            &Git::new(&self.work),
            &self.work,
            &self.config,
            options,
            &mut AssumeYes,
        )
    }

    fn head(&self) -> String {
        git(&self.work, &["rev-parse", "HEAD"])
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.work.join(rel)).expect("read")
    }
}

#[test]
fn new_upstream_release_is_merged_and_rebranded() {
    let Some(fx) = Fixture::new(true) else {
        return;
    };
    fx.publish_v1_4_0();
    let start = git(&fx.work, &["rev-parse", "segmentio-release"]);

    let outcome = fx.run(RunOptions::default()).expect("run");

    let RunOutcome::Released(release) = outcome else {
        panic!("expected a release, got {outcome:?}");
    };
    assert_eq!(release.tag, "v1.4.0");
    assert!(release.committed);
    assert_eq!(release.metadata.applied.len(), 3);

    assert_eq!(git(&fx.work, &["rev-parse", "--abbrev-ref", "HEAD"]), "segmentio-release");
    let range = format!("{start}..HEAD");
    assert_eq!(
        git(&fx.work, &["rev-list", "--count", "--first-parent", &range]),
        "2"
    );
    assert_eq!(git(&fx.work, &["log", "-1", "--format=%s", "HEAD~1"]), "merged Release v1.4.0");
    assert_eq!(git(&fx.work, &["log", "-1", "--format=%s"]), "created segmentio release");

    let committed = git(&fx.work, &["show", "--name-only", "--format=", "HEAD"]);
    for path in [
        "segmentio/__init__.py",
        "segmentio/batch.py",
        "segmentio/client.py",
        "segmentio/test/__init__.py",
        "setup.py",
    ] {
        assert!(committed.lines().any(|l| l == path), "{path} not in {committed}");
    }
    assert_eq!(git(&fx.work, &["status", "--porcelain"]), "");

    assert_eq!(
        fx.read("segmentio/client.py"),
        "import segmentio\nimport json\n\nclass Client(object):\n    timeout = 10\n"
    );
    assert_eq!(
        fx.read("segmentio/batch.py"),
        "from segmentio.client import Client\n"
    );
    assert!(!fx.work.join("segmentio/old_module.py").exists());

    let setup = fx.read("setup.py");
    assert!(setup.contains("name='segmentio',"));
    assert!(setup.contains("test_suite='segmentio.test.all',"));
    assert!(setup.contains("packages=['segmentio', 'segmentio.test'],"));
}

#[test]
fn up_to_date_release_branch_creates_no_commit() {
    let Some(fx) = Fixture::new(true) else {
        return;
    };
    git(&fx.work, &["checkout", "--quiet", "segmentio-release"]);
    let before = fx.head();

    let outcome = fx.run(RunOptions::default()).expect("run");

    assert_eq!(
        outcome,
        RunOutcome::UpToDate {
            tag: "v1.3.0".to_string()
        }
    );
    assert_eq!(fx.head(), before);
    assert!(!fx.work.join("segmentio").exists());
}

#[test]
fn missing_release_branch_leaves_repository_untouched() {
    let Some(fx) = Fixture::new(false) else {
        return;
    };
    fx.publish_v1_4_0();
    let before = fx.head();

    let err = fx.run(RunOptions::default()).unwrap_err();

    match &err {
        RebrandError::Setup { branch, tag } => {
            assert_eq!(branch, "segmentio-release");
            assert_eq!(tag, "v1.3.0");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("git checkout -b segmentio-release tags/v1.3.0"));
    assert_eq!(fx.head(), before);
    assert_eq!(git(&fx.work, &["rev-parse", "--abbrev-ref", "HEAD"]), "master");
    assert_eq!(git(&fx.work, &["tag", "--list", "v1.4.0"]), "");
    assert_eq!(git(&fx.work, &["status", "--porcelain"]), "");
}

#[test]
fn regeneration_drops_files_removed_since_last_generation() {
    let Some(fx) = Fixture::new(true) else {
        return;
    };
    git(&fx.work, &["checkout", "--quiet", "segmentio-release"]);
    write(&fx.work, "segmentio/stale.py", "STALE = True\n");
    git(&fx.work, &["add", "-A"]);
    git(&fx.work, &["commit", "--quiet", "-m", "previous generation"]);

    let outcome = fx
        .run(RunOptions {
            skip_release_merge: true,
        })
        .expect("run");

    assert!(matches!(outcome, RunOutcome::Released(_)));
    assert!(!fx.work.join("segmentio/stale.py").exists());
    assert_eq!(git(&fx.work, &["ls-files", "segmentio/stale.py"]), "");
    assert_eq!(
        fx.read("segmentio/old_module.py"),
        "OLD = True\n"
    );
}

#[test]
fn regenerating_twice_is_stable() {
    let Some(fx) = Fixture::new(true) else {
        return;
    };
    let options = RunOptions {
        skip_release_merge: true,
    };

    fx.run(options).expect("first run");
    let first = fx.read("segmentio/client.py");
    let head = fx.head();

    let outcome = fx.run(options).expect("second run");

    let RunOutcome::Released(release) = outcome else {
        panic!("expected a release");
    };
    assert!(!release.committed);
    assert_eq!(fx.head(), head);
    assert_eq!(fx.read("segmentio/client.py"), first);
}

#[test]
fn failure_after_merge_resets_to_starting_commit() {
    let Some(mut fx) = Fixture::new(true) else {
        return;
    };
    fx.publish_v1_4_0();
    fx.config.strict_metadata = true;
    fx.config.metadata_rules[0].from = "name='not-in-setup-py'".to_string();
    let start = git(&fx.work, &["rev-parse", "segmentio-release"]);

    let err = fx.run(RunOptions::default()).unwrap_err();

    assert!(matches!(err, RebrandError::MetadataLiteralMissing { .. }));
    assert_eq!(fx.head(), start);
    assert_eq!(git(&fx.work, &["status", "--porcelain"]), "");
    assert!(!fx.work.join("segmentio").exists());
    assert_eq!(fx.read("setup.py"), SETUP_PY);
}

#[test]
fn failure_restores_previous_generation_and_drops_new_files() {
    let Some(mut fx) = Fixture::new(true) else {
        return;
    };
    git(&fx.work, &["checkout", "--quiet", "segmentio-release"]);
    fx.run(RunOptions {
        skip_release_merge: true,
    })
    .expect("first generation");
    let generated = fx.read("segmentio/client.py");
    let start = fx.head();

    fx.publish_v1_4_0();
    fx.config.strict_metadata = true;
    fx.config.metadata_rules[0].from = "name='not-in-setup-py'".to_string();

    let err = fx.run(RunOptions::default()).unwrap_err();

    assert!(matches!(err, RebrandError::MetadataLiteralMissing { .. }));
    assert_eq!(fx.head(), start);
    assert_eq!(git(&fx.work, &["status", "--porcelain"]), "");
    assert_eq!(fx.read("segmentio/client.py"), generated);
    assert_eq!(fx.read("segmentio/old_module.py"), "OLD = True\n");
    assert!(!fx.work.join("segmentio/batch.py").exists());
}

#[test]
fn unrelated_staged_changes_stay_out_of_the_release_commit() {
    let Some(fx) = Fixture::new(true) else {
        return;
    };
    git(&fx.work, &["checkout", "--quiet", "segmentio-release"]);
    write(&fx.work, "NOTES.md", "work in progress\n");
    git(&fx.work, &["add", "NOTES.md"]);

    let outcome = fx
        .run(RunOptions {
            skip_release_merge: true,
        })
        .expect("run");

    assert!(matches!(outcome, RunOutcome::Released(_)));
    let committed = git(&fx.work, &["show", "--name-only", "--format=", "HEAD"]);
    assert!(committed.lines().all(|l| l != "NOTES.md"), "{committed}");
    assert!(committed.lines().any(|l| l == "segmentio/client.py"));
    assert_eq!(git(&fx.work, &["diff", "--cached", "--name-only"]), "NOTES.md");
}
