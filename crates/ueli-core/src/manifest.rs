//! Typed view of the Kubernetes manifests referenced by `deployments[].apply`.
//!
//! Only the fields ueli inspects are modelled; everything else in a manifest
//! is ignored. Required fields (`metadata.name`, and the template label
//! `name` for templated workloads) are enforced while deserializing, so a
//! parsed [`Manifest`] never needs key-existence checks.

use std::path::Path;

use serde::Deserialize;

/// One Kubernetes object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawManifest")]
pub struct Manifest {
    pub kind: Option<String>,
    pub name: String,
    pub workload: ManifestKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestKind {
    /// Deployment, StatefulSet, DaemonSet, Job, ... anything with `spec.template`.
    Templated(PodTemplate),
    /// Service, ConfigMap, Ingress, ...
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PodTemplate {
    pub metadata: TemplateMetadata,
    #[serde(default)]
    pub spec: PodSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateMetadata {
    pub labels: TemplateLabels,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateLabels {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PodSpec {
    #[serde(default)]
    pub volumes: Vec<Volume>,
    #[serde(default)]
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub config_map: Option<ConfigMapVolume>,
    pub secret: Option<SecretVolume>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigMapVolume {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretVolume {
    pub secret_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    pub value_from: Option<EnvVarSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVarSource {
    pub config_map_key_ref: Option<KeyRef>,
    pub secret_key_ref: Option<KeyRef>,
}

/// `configMapKeyRef` / `secretKeyRef`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyRef {
    pub name: String,
    pub key: String,
}

// Wire shape; converted into `Manifest` once at load time.
#[derive(Deserialize)]
struct RawManifest {
    kind: Option<String>,
    metadata: RawMetadata,
    spec: Option<RawSpec>,
}

#[derive(Deserialize)]
struct RawMetadata {
    name: String,
}

#[derive(Deserialize)]
struct RawSpec {
    template: Option<PodTemplate>,
}

impl From<RawManifest> for Manifest {
    fn from(raw: RawManifest) -> Self {
        let workload = match raw.spec.and_then(|s| s.template) {
            Some(template) => ManifestKind::Templated(template),
            None => ManifestKind::Plain,
        };
        Self {
            kind: raw.kind,
            name: raw.metadata.name,
            workload,
        }
    }
}

impl Manifest {
    pub fn pod_template(&self) -> Option<&PodTemplate> {
        match &self.workload {
            ManifestKind::Templated(template) => Some(template),
            ManifestKind::Plain => None,
        }
    }

    /// Object name plus, for templated workloads, the pod template label name.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str()];
        if let Some(template) = self.pod_template() {
            names.push(template.metadata.labels.name.as_str());
        }
        names
    }

    /// Load every document in a manifest file.
    ///
    /// Returns `Ok(None)` when the file does not exist. Empty documents
    /// (e.g. a trailing `---`) are skipped.
    pub fn load_all(path: &Path) -> crate::Result<Option<Vec<Self>>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(crate::Error::ManifestRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        parse_documents(&content)
            .map(Some)
            .map_err(|e| crate::Error::ManifestParse {
                path: path.to_path_buf(),
                source: e,
            })
    }
}

/// Parse a (possibly multi-document) YAML string into manifests.
pub fn parse_documents(content: &str) -> Result<Vec<Manifest>, serde_yaml::Error> {
    let mut manifests = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        manifests.push(serde_yaml::from_value(value)?);
    }
    Ok(manifests)
}
