use ueli_cloud::ShellExecutor;

use super::Context;
use crate::output;

/// Log in to gcloud (optionally) and select the configured project.
pub async fn init<E: ShellExecutor>(ctx: &Context<E>) -> anyhow::Result<()> {
    if output::confirm(
        "Do you want to (re)login to gcloud too? (will open browser)",
        ctx.assume_yes,
    )? {
        ctx.client.gcloud_login().await?;
    }

    ctx.client.set_project(&ctx.config.gcloud.project).await?;

    println!("Done!");
    Ok(())
}
