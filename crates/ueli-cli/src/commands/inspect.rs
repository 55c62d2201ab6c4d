use std::collections::BTreeSet;

use ueli_cloud::ShellExecutor;
use ueli_core::{InspectionReport, PlanInspector};

use super::Context;
use crate::output;

/// Inspect all manifests, print the findings, and return them.
pub(crate) fn inspect_and_report<E: ShellExecutor>(ctx: &Context<E>) -> InspectionReport {
    let report = PlanInspector::new(ctx.service()).inspect(&ctx.config.deployments, &ctx.base_dir);

    output::heading(&format!("{} wrong namings", report.warnings.len()));
    if !report.warnings.is_empty() {
        output::warn(&report.warnings.join("\n"));
    }

    print_set("config keys", &report.config_keys);
    print_set("secret keys", &report.secret_keys);
    print_set("mounted config maps", &report.mounted_config_maps);
    print_set("mounted secrets", &report.mounted_secrets);

    report
}

fn print_set(label: &str, items: &BTreeSet<String>) {
    output::heading(&format!("{} {label}", items.len()));
    if !items.is_empty() {
        output::ok(&join(items));
    }
}

pub(crate) fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
}

/// Check manifest naming and list the config and secret keys they use.
pub async fn inspect_deployments<E: ShellExecutor>(ctx: &Context<E>) -> anyhow::Result<()> {
    let report = inspect_and_report(ctx);
    if !report.is_clean() {
        anyhow::bail!("{} naming problem(s) found", report.warnings.len());
    }
    Ok(())
}
