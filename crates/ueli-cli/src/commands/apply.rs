use std::collections::BTreeSet;

use ueli_cloud::ShellExecutor;
use ueli_core::{InspectionReport, tag};

use super::Context;
use super::cluster::set_credentials;
use super::inspect::{inspect_and_report, join};
use crate::output;

/// Create or update an environment: namespace, base config map, and every manifest.
///
/// Nothing is touched unless the deployment plan inspects clean. With
/// `dry_run`, mutating commands are printed instead of run; lookups still run.
pub async fn apply<E: ShellExecutor>(
    ctx: &Context<E>,
    environment: &str,
    dry_run: bool,
) -> anyhow::Result<()> {
    let report = inspect_and_report(ctx);
    if !report.is_clean() {
        anyhow::bail!(
            "{} naming problem(s) found; fix them before applying",
            report.warnings.len()
        );
    }

    set_credentials(ctx, Some(environment)).await?;
    let client = &ctx.client;

    if !client.exists("namespace", environment, None).await? {
        client.create_namespace(environment, dry_run).await?;
    }

    let config_name = tag::config_map_name(ctx.service());
    if !client
        .exists("configmap", &config_name, Some(environment))
        .await?
    {
        client
            .create_config_map(&config_name, environment, dry_run)
            .await?;
    }

    for path in ctx.config.manifest_paths() {
        client.apply_file(path, environment, dry_run).await?;
    }

    let (configs, secrets) = pending_updates(&report);
    if !configs.is_empty() {
        output::heading(&format!(
            "Don't forget to update config with `ueli config {environment}`: \n\n{}\n",
            join(&configs)
        ));
    }

    if !secrets.is_empty() {
        output::heading(&format!(
            "Don't forget to update secrets: \n\n{}\n",
            join(&secrets)
        ));
    }

    println!("Done!");
    Ok(())
}

/// Config and secret names the operator has to fill in: referenced keys plus mounted objects.
fn pending_updates(report: &InspectionReport) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut configs = report.config_keys.clone();
    configs.extend(report.mounted_config_maps.iter().cloned());

    let mut secrets = report.secret_keys.clone();
    secrets.extend(report.mounted_secrets.iter().cloned());

    (configs, secrets)
}
