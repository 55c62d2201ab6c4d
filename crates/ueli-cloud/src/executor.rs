use std::process::Stdio;

use crate::shell::ShellError;

/// Abstraction over shell command execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait ShellExecutor: Send + Sync {
    /// Run a command line and capture stdout.
    async fn exec(&self, command: &str) -> Result<String, ShellError>;

    /// Run a command line attached to the terminal.
    async fn exec_streaming(&self, command: &str) -> Result<(), ShellError>;
}

/// Runs command lines through `sh -c`, so `$(...)` and pipes work.
pub struct RealExecutor;

impl RealExecutor {
    fn command(command: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

impl ShellExecutor for RealExecutor {
    async fn exec(&self, command: &str) -> Result<String, ShellError> {
        tracing::debug!(command, "exec");

        let output = Self::command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ShellError::Spawn {
                command: command.to_owned(),
                source: e,
            })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| ShellError::InvalidUtf8 {
                command: command.to_owned(),
                source: e,
            })
        } else {
            Err(ShellError::CommandFailed {
                command: command.to_owned(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            })
        }
    }

    async fn exec_streaming(&self, command: &str) -> Result<(), ShellError> {
        tracing::debug!(command, "exec (streaming)");

        let status = Self::command(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ShellError::Spawn {
                command: command.to_owned(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ShellError::CommandFailed {
                command: command.to_owned(),
                code: status.code(),
                stderr: String::new(),
            })
        }
    }
}
