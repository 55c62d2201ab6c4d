use crate::executor::{RealExecutor, ShellExecutor};
use crate::git::{self, GitInfo};
use crate::runner::{CommandRunner, RunOptions, RunOutcome};
use crate::shell::ShellError;

/// Namespaces every cluster has; never listed as environments.
pub const SYSTEM_NAMESPACES: &[&str] = &["default", "kube-system", "kube-public", "kube-node-lease"];

/// docker, gcloud, kubectl and git operations, parameterized over the executor for testability.
pub struct DeployClient<E: ShellExecutor = RealExecutor> {
    runner: CommandRunner<E>,
}

impl DeployClient<RealExecutor> {
    pub fn new(verbose: bool) -> Self {
        Self {
            runner: CommandRunner::new(verbose),
        }
    }
}

impl<E: ShellExecutor> DeployClient<E> {
    pub fn with_executor(executor: E, verbose: bool) -> Self {
        Self {
            runner: CommandRunner::with_executor(executor, verbose),
        }
    }

    pub fn runner(&self) -> &CommandRunner<E> {
        &self.runner
    }

    // ── Git ──

    pub async fn git_info(&self) -> Result<GitInfo, ClientError> {
        git::git_info(&self.runner)
            .await
            .map_err(|e| ClientError::Git { source: e })
    }

    pub async fn latest_remote_commit(
        &self,
        repository: &str,
        branch: &str,
    ) -> Result<Option<String>, ClientError> {
        git::latest_remote_commit(&self.runner, repository, branch)
            .await
            .map_err(|e| ClientError::Git { source: e })
    }

    // ── gcloud ──

    /// Interactive browser login, for the CLI and for application default credentials.
    pub async fn gcloud_login(&self) -> Result<(), ClientError> {
        for command in ["gcloud auth login", "gcloud auth application-default login"] {
            self.gcloud(command, RunOptions::stream()).await?;
        }
        Ok(())
    }

    pub async fn set_project(&self, project: &str) -> Result<(), ClientError> {
        self.gcloud(
            &format!("gcloud config set project {project}"),
            RunOptions::stream(),
        )
        .await
        .map(drop)
    }

    /// Point kubectl at `cluster`.
    pub async fn get_credentials(&self, cluster: &str, project: &str) -> Result<(), ClientError> {
        self.gcloud(
            &format!("gcloud container clusters get-credentials {cluster} --project={project}"),
            RunOptions::capture(),
        )
        .await
        .map(drop)
    }

    pub async fn push_image(&self, remote_tag: &str) -> Result<(), ClientError> {
        self.gcloud(
            &format!("gcloud docker -- push {remote_tag}"),
            RunOptions::stream().echo(),
        )
        .await
        .map(drop)
    }

    async fn gcloud(&self, command: &str, options: RunOptions) -> Result<RunOutcome, ClientError> {
        self.runner
            .run(command, options)
            .await
            .map_err(|e| ClientError::Gcloud { source: e })
    }

    // ── Docker ──

    pub async fn build_image(&self, build_tag: &str, context: &str) -> Result<(), ClientError> {
        let mut command = format!("docker build --tag {build_tag} {context}");
        if !self.runner.verbose() {
            command.push_str(" --quiet=true");
        }
        self.docker(&command).await
    }

    pub async fn tag_image(&self, build_tag: &str, remote_tag: &str) -> Result<(), ClientError> {
        self.docker(&format!("docker tag {build_tag} {remote_tag}"))
            .await
    }

    /// Remove every local image.
    pub async fn delete_all_images(&self) -> Result<(), ClientError> {
        self.docker("docker rmi -f $(docker images -q)").await
    }

    async fn docker(&self, command: &str) -> Result<(), ClientError> {
        self.runner
            .run(command, RunOptions::stream().echo())
            .await
            .map(drop)
            .map_err(|e| ClientError::Docker { source: e })
    }

    // ── kubectl ──

    /// `kubectl get {kind} -o name`, e.g. `["namespace/default", ...]`.
    pub async fn list(&self, kind: &str, namespace: Option<&str>) -> Result<Vec<String>, ClientError> {
        let mut command = format!("kubectl get {kind} -o name");
        if let Some(namespace) = namespace {
            command.push_str(&format!(" --namespace={namespace}"));
        }
        self.runner
            .capture_lines(&command)
            .await
            .map_err(|e| ClientError::Kubectl { source: e })
    }

    pub async fn exists(
        &self,
        kind: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<bool, ClientError> {
        let wanted = format!("{kind}/{name}");
        Ok(self.list(kind, namespace).await?.contains(&wanted))
    }

    /// Namespaces other than [`SYSTEM_NAMESPACES`].
    pub async fn environments(&self) -> Result<Vec<String>, ClientError> {
        let namespaces = self.list("namespace", None).await?;
        Ok(namespaces
            .iter()
            .filter_map(|n| n.strip_prefix("namespace/"))
            .filter(|n| !SYSTEM_NAMESPACES.contains(n))
            .map(str::to_owned)
            .collect())
    }

    pub async fn create_namespace(&self, namespace: &str, dry_run: bool) -> Result<(), ClientError> {
        self.kubectl(&format!("kubectl create namespace {namespace}"), dry_run)
            .await
    }

    pub async fn create_config_map(
        &self,
        name: &str,
        namespace: &str,
        dry_run: bool,
    ) -> Result<(), ClientError> {
        self.kubectl(
            &format!("kubectl create configmap {name} --namespace={namespace}"),
            dry_run,
        )
        .await
    }

    pub async fn apply_file(&self, file: &str, namespace: &str, dry_run: bool) -> Result<(), ClientError> {
        self.kubectl(
            &format!("kubectl apply -f {file} --namespace={namespace}"),
            dry_run,
        )
        .await
    }

    /// Opens `$EDITOR` on the config map through `kubectl edit`.
    pub async fn edit_config_map(&self, name: &str, namespace: &str) -> Result<(), ClientError> {
        self.kubectl(
            &format!("kubectl edit configmap {name} --namespace={namespace}"),
            false,
        )
        .await
    }

    async fn kubectl(&self, command: &str, dry_run: bool) -> Result<(), ClientError> {
        self.runner
            .run(command, RunOptions::stream().echo().dry_run(dry_run))
            .await
            .map(drop)
            .map_err(|e| ClientError::Kubectl { source: e })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("git command failed")]
    Git { source: ShellError },

    #[error("gcloud command failed")]
    Gcloud { source: ShellError },

    #[error("docker command failed")]
    Docker { source: ShellError },

    #[error("kubectl command failed")]
    Kubectl { source: ShellError },
}
