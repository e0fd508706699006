use crate::{
    banner::print_banner,
    config::{self, DEFAULT_CONFIG_FILE},
    error::{RebrandError, Result},
    git::Git,
    logging,
    prompt::{AssumeYes, ConfirmPrompter, DialoguerConfirmPrompter},
    workflow::{self, RunOptions, RunOutcome},
};

use clap::Parser;
use console::{Term, style};
use std::path::{Path, PathBuf};

const LONG_ABOUT: &str = "\
Rebrand a third-party package under a new namespace.

Works this way:

  1) based on a dedicated release branch (which must already exist)
  2) fetch the upstream default branch and tags
  3) confirm a new upstream release exists
  4) merge the new release into the release branch
  5) regenerate the renamed package and rewrite the packaging descriptor
  6) commit the regenerated package

Names, branches and descriptor literals are read from rebrand.toml at the
repository root when present.";

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "rebrand-release",
    version,
    about = "Merge the latest upstream release and regenerate the rebranded package",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    /// Skip the release check and merge; only regenerate and commit the package.
    #[arg(long)]
    pub skip_release_merge: bool,

    /// Merge new releases without asking.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Config file (default: rebrand.toml at the repository root).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// Log every copied file and git's stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            skip_release_merge: self.skip_release_merge,
        }
    }

    /// Config path to load, resolved against the repository root.
    pub fn config_path(&self, root: &Path) -> PathBuf {
        match &self.config {
            Some(path) => path.clone(),
            None => root.join(DEFAULT_CONFIG_FILE),
        }
    }

    /// Asks interactively only when allowed to and a terminal is attached.
    fn prompter(&self) -> Box<dyn ConfirmPrompter> {
        if self.yes || !Term::stdout().is_term() {
            Box::new(AssumeYes)
        } else {
            Box::new(DialoguerConfirmPrompter)
        }
    }
}

/// Verifies git is available and returns the repository root containing `dir`.
fn verify_environment(dir: &Path) -> Result<PathBuf> {
    which::which("git").map_err(|_| RebrandError::GitNotFound)?;
    let root = Git::new(dir).rev_parse("--show-toplevel")?;
    Ok(PathBuf::from(root))
}

fn execute(cli: &Cli) -> Result<()> {
    let root = verify_environment(&cli.repo)?;
    let config = config::load_config(&cli.config_path(&root))?;
    let git = Git::new(&root);
    let mut prompter = cli.prompter();

    match workflow::run(&git, &root, &config, cli.run_options(), prompter.as_mut())? {
        RunOutcome::UpToDate { tag } => {
            println!(
                "{}",
                style(format!("Already up to date with upstream release {tag}."))
                    .green()
                    .bold()
            );
        }
        RunOutcome::Declined { tag } => {
            println!(
                "{}",
                style(format!("Not merging {tag}. No changes made."))
                    .yellow()
                    .bold()
            );
        }
        RunOutcome::Released(release) => {
            print_banner(&config, &release.tag, &release.rewrite, &release.metadata);
        }
    }
    Ok(())
}

/// Main CLI entry point for `rebrand-release`.
///
/// This function:
/// 1. Parses CLI flags.
/// 2. Installs the log subscriber.
/// 3. Verifies that `git` is installed and locates the repository root.
/// 4. Loads `rebrand.toml` (or the defaults).
/// 5. Runs the release workflow and prints its outcome.
///
/// # Exit Codes
///
/// * `0` – Release created, already up to date, or merge declined.
/// * `1` – Any failure along the way (returned as `Err(())` after printing it).
pub fn entry() -> std::result::Result<i32, ()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match execute(&cli) {
        Ok(()) => Ok(0),
        Err(e) => {
            eprintln!("{}", style(format!("Error: {e}")).red().bold());
            Err(())
        }
    }
}
