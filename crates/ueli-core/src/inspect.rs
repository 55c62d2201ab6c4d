//! Deployment plan inspection.
//!
//! Walks every manifest referenced by the configured deployments, checks that
//! object names carry the service prefix, and collects the config map and
//! secret keys the manifests expect to exist. Nothing is mutated; manifests
//! are re-read on every call.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::DeploymentDescriptor;
use crate::manifest::{Manifest, PodTemplate};
use crate::tag;

/// Outcome of one inspection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionReport {
    /// Naming and schema problems, in order of first discovery, without duplicates.
    pub warnings: Vec<String>,
    /// Keys read from `{service}-config` through `configMapKeyRef`.
    pub config_keys: BTreeSet<String>,
    /// Keys read from `{service}-secret` through `secretKeyRef`.
    pub secret_keys: BTreeSet<String>,
    /// Config maps mounted as pod volumes.
    pub mounted_config_maps: BTreeSet<String>,
    /// Secrets mounted as pod volumes.
    pub mounted_secrets: BTreeSet<String>,
}

impl InspectionReport {
    /// `true` iff no warnings were recorded; gates `apply`.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn warn(&mut self, message: String) {
        if !self.warnings.contains(&message) {
            self.warnings.push(message);
        }
    }
}

/// Inspects deployment descriptors for one service.
#[derive(Debug, Clone)]
pub struct PlanInspector<'a> {
    service: &'a str,
    config_map: String,
    secret: String,
}

impl<'a> PlanInspector<'a> {
    pub fn new(service: &'a str) -> Self {
        Self {
            service,
            config_map: tag::config_map_name(service),
            secret: tag::secret_name(service),
        }
    }

    /// Inspect all deployments. Relative manifest paths are resolved against `base_dir`.
    pub fn inspect(&self, deployments: &[DeploymentDescriptor], base_dir: &Path) -> InspectionReport {
        let mut report = InspectionReport::default();

        for deployment in deployments {
            if !deployment.name.starts_with(self.service) {
                report.warn(format!(
                    "Ueli config deployment name '{name}' doesn't start with {service}",
                    name = deployment.name,
                    service = self.service,
                ));
            }

            for path in &deployment.apply {
                self.inspect_file(&mut report, path, base_dir);
            }
        }

        report
    }

    fn inspect_file(&self, report: &mut InspectionReport, path: &str, base_dir: &Path) {
        let manifests = match Manifest::load_all(&base_dir.join(path)) {
            Ok(Some(manifests)) => manifests,
            Ok(None) => {
                tracing::debug!(path, "manifest not found, skipping");
                return;
            }
            Err(crate::Error::ManifestParse { source, .. }) => {
                report.warn(format!("{path}: invalid manifest: {source}"));
                return;
            }
            Err(e) => {
                tracing::debug!(path, error = %e, "manifest unreadable, skipping");
                return;
            }
        };

        for manifest in &manifests {
            self.inspect_manifest(report, path, manifest);
        }
    }

    /// Check one parsed manifest; `path` only labels warnings.
    pub fn inspect_manifest(&self, report: &mut InspectionReport, path: &str, manifest: &Manifest) {
        for name in manifest.names() {
            if !name.starts_with(self.service) {
                report.warn(format!(
                    "{path}: Name '{name}' doesn't start with {service}",
                    service = self.service,
                ));
            }
        }

        if let Some(template) = manifest.pod_template() {
            self.collect_references(report, template);
        }
    }

    fn collect_references(&self, report: &mut InspectionReport, template: &PodTemplate) {
        for volume in &template.spec.volumes {
            if let Some(config_map) = &volume.config_map {
                report.mounted_config_maps.insert(config_map.name.clone());
            }
            if let Some(secret) = &volume.secret {
                report.mounted_secrets.insert(secret.secret_name.clone());
            }
        }

        let sources = template
            .spec
            .containers
            .iter()
            .flat_map(|c| &c.env)
            .filter_map(|e| e.value_from.as_ref());

        for source in sources {
            if let Some(key_ref) = &source.config_map_key_ref {
                if key_ref.name == self.config_map {
                    report.config_keys.insert(key_ref.key.clone());
                }
            }
            if let Some(key_ref) = &source.secret_key_ref {
                if key_ref.name == self.secret {
                    report.secret_keys.insert(key_ref.key.clone());
                }
            }
        }
    }
}
