//! External process plumbing for ueli.
//!
//! Every `docker`, `gcloud`, `kubectl` and `git` invocation goes through a
//! [`CommandRunner`], which echoes, dry-runs, captures or streams a shell
//! command line and reports non-zero exits as [`ShellError`].

pub mod client;
pub mod executor;
pub mod git;
pub mod runner;
pub mod shell;

pub use client::{ClientError, DeployClient, SYSTEM_NAMESPACES};
pub use executor::{RealExecutor, ShellExecutor};
pub use git::GitInfo;
pub use runner::{CommandRunner, RunOptions, RunOutcome};
pub use shell::ShellError;
