use dialoguer::{Confirm, theme::ColorfulTheme};

/// Abstraction over a boolean (yes/no) confirmation prompt.
///
/// This trait allows interactive confirmation to be injected or mocked,
/// so the release workflow can be driven without a terminal.
pub trait ConfirmPrompter {
    /// Prompt the user for a yes/no confirmation.
    ///
    /// # Parameters
    /// - `prompt`: The confirmation message.
    /// - `default`: The default answer if the user presses Enter.
    ///
    /// # Returns
    /// `Ok(true)` if confirmed, `Ok(false)` if declined, or `Err(String)` on input failure.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String>;
}

/// Default implementation of `ConfirmPrompter` using `dialoguer::Confirm`.
///
/// Displays a yes/no dialog with styling from `ColorfulTheme`.
pub struct DialoguerConfirmPrompter;

impl ConfirmPrompter for DialoguerConfirmPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String> {
        let theme = ColorfulTheme::default();
        let confirm = Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default);
        match confirm.interact() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Prompter used for unattended runs (`--yes`, or no terminal attached).
pub struct AssumeYes;

impl ConfirmPrompter for AssumeYes {
    fn confirm(&mut self, _prompt: &str, _default: bool) -> Result<bool, String> {
        Ok(true)
    }
}

/// Builds the question asked before an upstream release is merged.
fn merge_prompt(tag: &str, current: &str, branch: &str) -> String {
    format!("Merge upstream release {tag} (currently {current}) into {branch}?")
}

/// Ask the user to confirm merging an upstream release into the release branch.
///
/// # Parameters
/// - `prompter`: A mutable reference to a `ConfirmPrompter` implementation.
/// - `tag`: The upstream tag about to be merged.
/// - `current`: The tag the release branch is currently on.
/// - `branch`: The release branch receiving the merge.
///
/// # Returns
/// - `Ok(true)` if the user confirmed.
/// - `Ok(false)` if the user declined.
/// - `Err(String)` if input failed.
pub fn confirm_merge<P: ConfirmPrompter + ?Sized>(
    prompter: &mut P,
    tag: &str,
    current: &str,
    branch: &str,
) -> Result<bool, String> {
    prompter.confirm(&merge_prompt(tag, current, branch), true)
}
