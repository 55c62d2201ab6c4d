mod apply;
mod build;
mod cluster;
mod deploy;
mod images;
mod init;
mod inspect;
mod status;

use std::path::PathBuf;

use ueli_cloud::{DeployClient, RealExecutor, ShellExecutor};
use ueli_core::UeliConfig;

pub use apply::apply;
pub use build::{build, push};
pub use cluster::{edit_config, list_environments, set_credentials};
pub use deploy::{deploy, latest};
pub use images::delete_images;
pub use init::init;
pub use inspect::inspect_deployments;
pub use status::status;

/// Everything a command handler needs for one invocation.
pub struct Context<E: ShellExecutor = RealExecutor> {
    pub config: UeliConfig,
    pub client: DeployClient<E>,
    /// Answer every confirmation prompt with yes.
    pub assume_yes: bool,
    /// Directory relative manifest paths are resolved against.
    pub base_dir: PathBuf,
}

impl<E: ShellExecutor> Context<E> {
    pub fn service(&self) -> &str {
        &self.config.service
    }
}
