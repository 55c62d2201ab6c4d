use crate::executor::{RealExecutor, ShellExecutor};
use crate::shell::ShellError;

/// How a single command is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Print the command line before running it.
    pub echo: bool,
    /// Return trimmed stdout instead of attaching to the terminal.
    pub capture: bool,
    /// `false` is a dry run: nothing is spawned.
    pub execute: bool,
}

impl RunOptions {
    pub fn capture() -> Self {
        Self {
            echo: false,
            capture: true,
            execute: true,
        }
    }

    pub fn stream() -> Self {
        Self {
            echo: false,
            capture: false,
            execute: true,
        }
    }

    pub fn echo(mut self) -> Self {
        self.echo = true;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.execute = !dry_run;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Trimmed stdout.
    Captured(String),
    Streamed,
    /// Dry run; no process was spawned.
    Skipped,
}

impl RunOutcome {
    pub fn into_output(self) -> Option<String> {
        match self {
            Self::Captured(output) => Some(output),
            Self::Streamed | Self::Skipped => None,
        }
    }
}

/// The one place external processes are started from.
pub struct CommandRunner<E: ShellExecutor = RealExecutor> {
    executor: E,
    verbose: bool,
}

impl CommandRunner<RealExecutor> {
    pub fn new(verbose: bool) -> Self {
        Self::with_executor(RealExecutor, verbose)
    }
}

impl<E: ShellExecutor> CommandRunner<E> {
    /// `verbose` echoes every command regardless of [`RunOptions::echo`].
    pub fn with_executor(executor: E, verbose: bool) -> Self {
        Self { executor, verbose }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn run(&self, command: &str, options: RunOptions) -> Result<RunOutcome, ShellError> {
        let echo = options.echo || self.verbose;

        if !options.execute {
            if echo {
                println!("$ {command}  (dry run)");
            }
            tracing::debug!(command, "dry run, not executed");
            return Ok(RunOutcome::Skipped);
        }

        if echo {
            println!("$ {command}");
        }

        if options.capture {
            let output = self.executor.exec(command).await?;
            Ok(RunOutcome::Captured(output.trim().to_owned()))
        } else {
            self.executor.exec_streaming(command).await?;
            Ok(RunOutcome::Streamed)
        }
    }

    /// Run a query and return its trimmed stdout. Queries ignore dry runs.
    pub async fn capture(&self, command: &str) -> Result<String, ShellError> {
        let outcome = self.run(command, RunOptions::capture()).await?;
        Ok(outcome.into_output().unwrap_or_default())
    }

    /// Run a query and split its stdout into non-empty lines.
    pub async fn capture_lines(&self, command: &str) -> Result<Vec<String>, ShellError> {
        let output = self.capture(command).await?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }
}
