use console::{Color, measure_text_width, style};
use std::iter;

use crate::config::RebrandConfig;
use crate::metadata::MetadataReport;
use crate::rewrite::RewriteReport;

/// Prints a colorized box summarising a finished rebrand release.
///
/// The box is sized to the widest **visible** line, using
/// [`console::measure_text_width`] so ANSI color codes inside the content do
/// not throw off the padding. Borders are styled independently from the inner
/// text so embedded colors never bleed into the frame. The frame turns yellow
/// when some descriptor literal was not found.
///
/// # Parameters
///
/// * `config` – Names and branches used by the run.
/// * `tag` – The upstream release that was rebranded.
/// * `rewrite` – What the namespace rewriter produced.
/// * `metadata` – Which descriptor literals were replaced.
///
/// # Notes
///
/// * Intended for interactive display after the run; structured progress is
///   reported through `tracing`.
pub fn print_banner(
    config: &RebrandConfig,
    tag: &str,
    rewrite: &RewriteReport,
    metadata: &MetadataReport,
) {
    let lines = banner_lines(config, tag, rewrite, metadata);

    let max_width = lines
        .iter()
        .map(|l| measure_text_width(l)) // ignore ANSI in content
        .max()
        .unwrap_or(0)
        + 2;

    let color = frame_color(metadata);
    let frame = |s: String| style(s).fg(color).bold().to_string();
    let border = "═".repeat(max_width);

    println!();
    println!("{}", frame(format!("╔{border}╗")));
    for line in lines {
        let padding = " ".repeat(max_width - 1 - measure_text_width(&line));
        println!("{}{line}{padding}{}", frame("║ ".into()), frame("║".into()));
    }
    println!("{}", frame(format!("╚{border}╝")));
    println!();
}

/// Green for a clean release, yellow when the descriptor was only partly rebranded.
fn frame_color(metadata: &MetadataReport) -> Color {
    if metadata.missing.is_empty() {
        Color::Green
    } else {
        Color::Yellow
    }
}

/// Constructs the banner lines, in display order:
/// 1) title, 2) file counts, 3) descriptor warnings (if any), 4) push hint.
///
/// **Note:** the warning and push lines carry ANSI styling; measure them with
/// `console::measure_text_width` rather than `str::len()`.
fn banner_lines(
    config: &RebrandConfig,
    tag: &str,
    rewrite: &RewriteReport,
    metadata: &MetadataReport,
) -> Vec<String> {
    let top = [
        format!(
            "Created {} release {} from {}",
            config.target_package, tag, config.source_package
        ),
        String::new(),
        format!("Branch: {}", config.release_branch),
        format!(
            "Files: {} refactored, {} copied, {} directories",
            rewrite.refactored.len(),
            rewrite.copied.len(),
            rewrite.directories.len()
        ),
        format!(
            "{}: {} of {} literals rewritten",
            config.descriptor,
            metadata.applied.len(),
            metadata.applied.len() + metadata.missing.len()
        ),
    ]
    .into_iter();

    let warnings = metadata.missing.iter().map(|literal| {
        style(format!("  not found: {literal}"))
            .yellow()
            .bold()
            .to_string()
    });

    let bottom = iter::once(String::new())
        .chain(iter::once(style("Now you may run:").cyan().bold().to_string()))
        .chain(iter::once(
            style(format!(
                "  git push {} {}",
                config.push_remote, config.release_branch
            ))
            .cyan()
            .to_string(),
        ));

    top.chain(warnings).chain(bottom).collect()
}
