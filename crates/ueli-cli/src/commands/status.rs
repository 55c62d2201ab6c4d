use ueli_cloud::ShellExecutor;

use super::Context;
use crate::output;

/// Show the loaded configuration and the local repository state.
pub async fn status<E: ShellExecutor>(ctx: &Context<E>, details: bool) -> anyhow::Result<()> {
    let config = &ctx.config;

    output::heading("Service");
    output::ok(&config.service);

    output::heading("Gcloud");
    output::ok(&format!("Project: {}", config.gcloud.project));
    output::ok(&format!("Registry: {}", config.gcloud.registry));
    output::ok(&format!("Cluster: {}", config.gcloud.cluster));

    output::heading("Repository Status");
    let git = ctx.client.git_info().await?;
    output::ok(&format!("Current Branch: {}", git.branch));
    output::ok(&format!("Last Commit: {}", git.commit));
    let clean = format!("Clean: {}", git.clean);
    if git.clean {
        output::ok(&clean);
    } else {
        output::warn(&clean);
    }

    if details {
        output::heading("Config File");
        println!("{}", serde_json::to_string_pretty(config)?);
    }

    Ok(())
}
