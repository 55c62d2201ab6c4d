use ueli_cloud::ShellExecutor;

use super::Context;
use crate::output;

/// Delete all local docker images.
pub async fn delete_images<E: ShellExecutor>(ctx: &Context<E>) -> anyhow::Result<()> {
    output::confirm_or_abort(
        "Are you sure you want to delete all docker images?",
        ctx.assume_yes,
    )?;
    ctx.client.delete_all_images().await?;
    Ok(())
}
