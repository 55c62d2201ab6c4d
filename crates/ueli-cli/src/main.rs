mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ueli_cloud::DeployClient;
use ueli_core::{CONFIG_FILE_NAME, UeliConfig};

use commands::Context;

/// Ueli the servant helps to build and deploy.
///
/// Run `ueli status` to check the current configuration and `ueli init` to
/// log in to gcloud for this project.
///
/// Usual workflow:
///
///     ueli build
///     ueli push
///     ueli deploy stage1 branch-xy
///
/// Create a new environment:
///
///     ueli apply stage2
///     ueli config stage2
///     ueli deploy stage2 branch-xy
#[derive(Parser)]
#[command(name = "ueli", verbatim_doc_comment)]
#[command(version)]
struct Cli {
    /// Echo every external command before running it
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[command(rename_all = "snake_case")]
enum Commands {
    /// Show configuration and local repository status
    Status {
        /// Dump the whole configuration
        #[arg(long)]
        details: bool,
    },
    /// Log in to gcloud and select the project
    Init,
    /// Build the image for the current branch
    Build {
        /// Build even with uncommitted changes
        #[arg(long)]
        force: bool,
        /// Override the `{branch}.{commit}` tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Push the image to the remote registry
    Push {
        /// Override the `{branch}.{commit}` tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Delete all local docker images
    DeleteImages,
    /// Point kubectl at the project's cluster
    SetCredentials {
        /// Environment whose cluster to use (for per-environment clusters)
        environment: Option<String>,
    },
    /// List the environments (namespaces) of the cluster
    ListEnvironments,
    /// Create or update an environment
    Apply {
        environment: String,
        /// Print mutating commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Edit the environment's config map
    Config { environment: String },
    /// Show the latest remote commit of a branch
    Latest { branch: String },
    /// Deploy a branch to an environment
    Deploy {
        environment: String,
        #[arg(default_value = "master")]
        branch: String,
    },
    /// Check k8s naming and collect config and secret keys
    InspectDeployments,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!(config = %cli.config.display(), "loading configuration");
    let Some(config) = UeliConfig::load(&cli.config)? else {
        anyhow::bail!("No config file '{}' found", cli.config.display());
    };

    let ctx = Context {
        config,
        client: DeployClient::new(cli.verbose),
        assume_yes: cli.yes,
        base_dir: PathBuf::from("."),
    };

    match cli.command {
        Commands::Status { details } => commands::status(&ctx, details).await?,
        Commands::Init => commands::init(&ctx).await?,
        Commands::Build { force, tag } => commands::build(&ctx, force, tag.as_deref()).await?,
        Commands::Push { tag } => commands::push(&ctx, tag.as_deref()).await?,
        Commands::DeleteImages => commands::delete_images(&ctx).await?,
        Commands::SetCredentials { environment } => {
            commands::set_credentials(&ctx, environment.as_deref()).await?
        }
        Commands::ListEnvironments => commands::list_environments(&ctx).await?,
        Commands::Apply {
            environment,
            dry_run,
        } => commands::apply(&ctx, &environment, dry_run).await?,
        Commands::Config { environment } => commands::edit_config(&ctx, &environment).await?,
        Commands::Latest { branch } => commands::latest(&ctx, &branch).await?,
        Commands::Deploy {
            environment,
            branch,
        } => commands::deploy(&ctx, &environment, &branch).await?,
        Commands::InspectDeployments => commands::inspect_deployments(&ctx).await?,
    }

    Ok(())
}
