use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "ueli.yaml";

/// ueli.yaml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UeliConfig {
    /// Service name; prefixes image tags, config maps, secrets and k8s object names
    pub service: String,
    pub gcloud: GcloudConfig,
    /// Logical deployments in apply order
    pub deployments: Vec<DeploymentDescriptor>,
    /// Git remote queried for the latest deployable commit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcloudConfig {
    /// GCP project ID
    pub project: String,
    /// Container registry host, e.g. `eu.gcr.io`
    pub registry: String,
    pub cluster: ClusterSetting,
}

/// Either one cluster for every environment, or a cluster per environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterSetting {
    Single(String),
    PerEnvironment(BTreeMap<String, String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentDescriptor {
    pub name: String,
    /// Kubernetes manifest files, applied in order
    #[serde(default)]
    pub apply: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Docker build context directory
    #[serde(default = "default_context")]
    pub context: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            context: default_context(),
        }
    }
}

fn default_context() -> String {
    "source".to_owned()
}

impl UeliConfig {
    /// Load the config at `path`. Returns `Ok(None)` if the file does not exist.
    pub fn load(path: &Path) -> crate::Result<Option<Self>> {
        load_yaml_file(path)
    }

    /// Every manifest path referenced by the deployments, in declared order.
    pub fn manifest_paths(&self) -> impl Iterator<Item = &str> {
        self.deployments
            .iter()
            .flat_map(|d| d.apply.iter().map(String::as_str))
    }
}

impl ClusterSetting {
    /// Pick the cluster for `environment`.
    ///
    /// A single cluster serves every environment. A mapping is looked up by
    /// environment name, or, without an environment, resolves only when it
    /// holds exactly one entry.
    pub fn resolve(&self, environment: Option<&str>) -> crate::Result<&str> {
        match (self, environment) {
            (Self::Single(cluster), _) => Ok(cluster.as_str()),
            (Self::PerEnvironment(map), Some(env)) => {
                map.get(env)
                    .map(String::as_str)
                    .ok_or_else(|| crate::Error::UnknownEnvironment {
                        environment: env.to_owned(),
                        known: map.keys().cloned().collect(),
                    })
            }
            (Self::PerEnvironment(map), None) => {
                let mut clusters = map.values();
                match (clusters.next(), clusters.next()) {
                    (Some(only), None) => Ok(only.as_str()),
                    _ => Err(crate::Error::AmbiguousCluster {
                        known: map.keys().cloned().collect(),
                    }),
                }
            }
        }
    }

    /// Distinct cluster names, sorted.
    pub fn clusters(&self) -> Vec<&str> {
        match self {
            Self::Single(cluster) => vec![cluster.as_str()],
            Self::PerEnvironment(map) => {
                let mut clusters: Vec<&str> = map.values().map(String::as_str).collect();
                clusters.sort_unstable();
                clusters.dedup();
                clusters
            }
        }
    }
}

impl fmt::Display for ClusterSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(cluster) => f.write_str(cluster),
            Self::PerEnvironment(map) => {
                let pairs: Vec<String> = map
                    .iter()
                    .map(|(env, cluster)| format!("{env}={cluster}"))
                    .collect();
                f.write_str(&pairs.join(", "))
            }
        }
    }
}

/// Read and deserialize a YAML file, or `Ok(None)` if it does not exist.
fn load_yaml_file<T: DeserializeOwned>(path: &Path) -> crate::Result<Option<T>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "yaml file not found");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|e| crate::Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_env(pairs: &[(&str, &str)]) -> ClusterSetting {
        ClusterSetting::PerEnvironment(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    #[test]
    fn single_cluster_serves_every_environment() {
        let cluster = ClusterSetting::Single("main".to_owned());
        assert_eq!(cluster.resolve(None).unwrap(), "main");
        assert_eq!(cluster.resolve(Some("stage1")).unwrap(), "main");
    }

    #[test]
    fn mapping_resolves_by_environment() {
        let cluster = per_env(&[("production", "prod"), ("stage1", "staging")]);
        assert_eq!(cluster.resolve(Some("production")).unwrap(), "prod");
        assert_eq!(cluster.resolve(Some("stage1")).unwrap(), "staging");
    }

    #[test]
    fn mapping_unknown_environment_errors() {
        let cluster = per_env(&[("production", "prod")]);
        let err = cluster.resolve(Some("stage9")).unwrap_err().to_string();
        assert!(err.contains("stage9"), "got: {err}");
        assert!(err.contains("production"), "got: {err}");
    }

    #[test]
    fn mapping_without_environment_needs_single_entry() {
        assert_eq!(per_env(&[("production", "prod")]).resolve(None).unwrap(), "prod");

        let ambiguous = per_env(&[("production", "prod"), ("stage1", "staging")]);
        assert!(matches!(
            ambiguous.resolve(None),
            Err(crate::Error::AmbiguousCluster { .. })
        ));
    }

    #[test]
    fn clusters_are_distinct() {
        let cluster = per_env(&[("a", "staging"), ("b", "prod"), ("c", "staging")]);
        assert_eq!(cluster.clusters(), vec!["prod", "staging"]);
    }

    #[test]
    fn display_mapping() {
        let cluster = per_env(&[("production", "prod"), ("stage1", "staging")]);
        assert_eq!(cluster.to_string(), "production=prod, stage1=staging");
    }

    #[test]
    fn load_yaml_file_missing_is_none_and_bad_yaml_is_parse_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = load_yaml_file::<UeliConfig>(&tmp.path().join("absent.yaml")).unwrap();
        assert!(missing.is_none());

        let path = tmp.path().join("ueli.yaml");
        std::fs::write(&path, "service: [unclosed").unwrap();
        let err = load_yaml_file::<UeliConfig>(&path).unwrap_err();
        assert!(matches!(err, crate::Error::ConfigParse { .. }), "got: {err}");
    }
}
