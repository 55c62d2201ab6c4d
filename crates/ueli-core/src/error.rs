use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    // ── Kubernetes manifests ──
    #[error("failed to read manifest {path}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    // ── Cluster resolution ──
    #[error("no cluster configured for environment '{environment}'; known: {}", format_known(known))]
    UnknownEnvironment {
        environment: String,
        known: Vec<String>,
    },

    #[error(
        "gcloud.cluster maps several environments ({}); pass an environment to pick one",
        format_known(known)
    )]
    AmbiguousCluster { known: Vec<String> },
}

fn format_known(known: &[String]) -> String {
    if known.is_empty() {
        "(none)".to_owned()
    } else {
        known.join(", ")
    }
}
