use ueli_cloud::ShellExecutor;
use ueli_core::tag;

use super::Context;
use crate::output;

/// Point kubectl at the cluster serving `environment`.
pub async fn set_credentials<E: ShellExecutor>(
    ctx: &Context<E>,
    environment: Option<&str>,
) -> anyhow::Result<()> {
    let gcloud = &ctx.config.gcloud;
    let cluster = gcloud.cluster.resolve(environment)?;
    ctx.client.get_credentials(cluster, &gcloud.project).await?;
    Ok(())
}

/// List the namespaces of every configured cluster.
pub async fn list_environments<E: ShellExecutor>(ctx: &Context<E>) -> anyhow::Result<()> {
    let gcloud = &ctx.config.gcloud;
    let clusters = gcloud.cluster.clusters();

    for cluster in &clusters {
        ctx.client.get_credentials(cluster, &gcloud.project).await?;
        let environments = ctx.client.environments().await?;

        if clusters.len() > 1 {
            output::heading(&format!("Cluster {cluster}"));
        }
        output::heading(&format!("{} available environments", environments.len()));
        output::ok(&environments.join("\n"));
    }

    Ok(())
}

/// Open the service's config map in `$EDITOR`.
pub async fn edit_config<E: ShellExecutor>(ctx: &Context<E>, environment: &str) -> anyhow::Result<()> {
    set_credentials(ctx, Some(environment)).await?;

    let name = tag::config_map_name(ctx.service());
    ctx.client.edit_config_map(&name, environment).await?;
    Ok(())
}
