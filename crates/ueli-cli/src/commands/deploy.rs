use ueli_cloud::ShellExecutor;
use ueli_core::tag;

use super::Context;
use super::cluster::set_credentials;
use crate::output::{self, PreconditionFailed};

/// The only branch allowed onto `production`.
const PRODUCTION_BRANCH: &str = "master";

/// Print the newest commit of `branch` on the remote repository.
pub async fn latest<E: ShellExecutor>(ctx: &Context<E>, branch: &str) -> anyhow::Result<()> {
    match latest_commit(ctx, branch).await? {
        Some(commit) => println!(
            "Latest commit on '{branch}' available for deploy is '{commit}'"
        ),
        None => output::warn(&format!(
            "No commit for '{branch}' found on remote repository. `git push`?"
        )),
    }
    Ok(())
}

async fn latest_commit<E: ShellExecutor>(
    ctx: &Context<E>,
    branch: &str,
) -> anyhow::Result<Option<String>> {
    let repository = ctx
        .config
        .repository
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("repository not set in ueli.yaml"))?;

    Ok(ctx.client.latest_remote_commit(repository, branch).await?)
}

/// Resolve the image for `branch` and confirm rolling it out to `environment`.
pub async fn deploy<E: ShellExecutor>(
    ctx: &Context<E>,
    environment: &str,
    branch: &str,
) -> anyhow::Result<()> {
    if environment == "production" && branch != PRODUCTION_BRANCH {
        return Err(PreconditionFailed(format!(
            "Only '{PRODUCTION_BRANCH}' can be deployed to 'production'."
        ))
        .into());
    }

    set_credentials(ctx, Some(environment)).await?;

    if !ctx.client.exists("namespace", environment, None).await? {
        return Err(PreconditionFailed(format!(
            "Can not deploy to '{environment}', environment doesn't exist. \
             Use `ueli list_environments` to see which one exists or \
             `ueli apply NAME` to create one."
        ))
        .into());
    }

    let Some(commit) = latest_commit(ctx, branch).await? else {
        return Err(PreconditionFailed(format!(
            "No commit for '{branch}' found on remote repository. `git push`?"
        ))
        .into());
    };
    println!("Latest commit on '{branch}' available for deploy is '{commit}'");

    let build_tag = tag::build_tag(ctx.service(), branch, &commit);
    output::heading(&format!("Deploying '{build_tag}' to '{environment}'"));
    output::confirm_or_abort("Do you want to continue?", ctx.assume_yes)?;

    let gcloud = &ctx.config.gcloud;
    let remote_tag = tag::remote_tag(&tag::remote(&gcloud.registry, &gcloud.project), &build_tag);
    output::ok(&format!("Image: {remote_tag}"));

    Ok(())
}
