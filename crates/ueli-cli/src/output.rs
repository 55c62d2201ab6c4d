//! Colored status lines and confirmation prompts.

use std::io::Write;

use colored::{Color, Colorize};

pub fn heading(text: &str) {
    println!("{}", text.cyan());
}

pub fn ok(text: &str) {
    println!("{}", text.green());
}

pub fn warn(text: &str) {
    println!("{}", text.yellow());
}

/// The command cannot go ahead in the current state (dirty tree, unknown
/// environment, ...). Reported in yellow rather than as a failure.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct PreconditionFailed(pub String);

/// Print a command's error to stderr.
pub fn error(error: &anyhow::Error) {
    eprintln!("{}", format!("{error:#}").color(error_color(error)));
}

fn error_color(error: &anyhow::Error) -> Color {
    if error.downcast_ref::<PreconditionFailed>().is_some() {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Ask a yes/no question on the terminal. `assume_yes` answers without asking.
pub fn confirm(question: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    print!("{question} [y/N] ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim(), "y" | "Y" | "yes" | "YES"))
}

/// Like [`confirm`], but declining aborts the command.
pub fn confirm_or_abort(question: &str, assume_yes: bool) -> anyhow::Result<()> {
    if confirm(question, assume_yes)? {
        Ok(())
    } else {
        anyhow::bail!("Aborted!")
    }
}
