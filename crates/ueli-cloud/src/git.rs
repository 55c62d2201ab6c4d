use crate::executor::ShellExecutor;
use crate::runner::{CommandRunner, RunOptions};
use crate::shell::ShellError;

/// Length of the abbreviated commit hashes used in image tags.
pub const SHORT_COMMIT_LEN: usize = 7;

/// State of the local repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    pub branch: String,
    /// Abbreviated hash of `branch`'s head.
    pub commit: String,
    /// No uncommitted changes per `git status --porcelain`.
    pub clean: bool,
}

pub async fn git_info<E: ShellExecutor>(runner: &CommandRunner<E>) -> Result<GitInfo, ShellError> {
    let branch = runner.capture("git rev-parse --abbrev-ref HEAD").await?;
    let commit = runner
        .capture(&format!("git rev-parse --short --verify {branch}"))
        .await?;
    let changes = runner.capture_lines("git status --porcelain").await?;

    Ok(GitInfo {
        branch,
        commit,
        clean: changes.is_empty(),
    })
}

/// Short hash of the newest commit of `branch` on `repository`, if it has one.
pub async fn latest_remote_commit<E: ShellExecutor>(
    runner: &CommandRunner<E>,
    repository: &str,
    branch: &str,
) -> Result<Option<String>, ShellError> {
    let output = runner
        .run(
            &format!("git ls-remote {repository} {branch}"),
            RunOptions::capture().echo(),
        )
        .await?
        .into_output()
        .unwrap_or_default();

    Ok(parse_ls_remote(&output))
}

/// First hash of `git ls-remote` output (`<hash>\t<ref>` lines), shortened.
pub fn parse_ls_remote(output: &str) -> Option<String> {
    let hash = output.lines().next()?.split_whitespace().next()?;
    Some(hash.chars().take(SHORT_COMMIT_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ls_remote_takes_first_hash() {
        let output = "4f2a9c1e0b7d3a8f6e5c4b3a2d1e0f9a8b7c6d5e\trefs/heads/master\n\
                      0000000000000000000000000000000000000000\trefs/heads/master-old\n";
        assert_eq!(parse_ls_remote(output).as_deref(), Some("4f2a9c1"));
    }

    #[test]
    fn parse_ls_remote_empty_is_none() {
        assert_eq!(parse_ls_remote(""), None);
        assert_eq!(parse_ls_remote("   "), None);
    }

    #[test]
    fn parse_ls_remote_short_hash_kept_whole() {
        assert_eq!(parse_ls_remote("abc\trefs/heads/x").as_deref(), Some("abc"));
    }
}
