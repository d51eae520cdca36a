mod args;
mod commands;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use rollout_core::{Stage, SyncPolicy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rollout",
    about = "Clone, build, and helm-upgrade an application at a given commit"
)]
#[command(version)]
struct Cli {
    /// Git revision to check out; also the image tag unless --image-version is set
    #[arg(long, visible_alias = "commit-hash")]
    commit: Option<String>,

    /// Container image name
    #[arg(long)]
    image_name: Option<String>,

    /// Image tag, overriding the commit hash
    #[arg(long)]
    image_version: Option<String>,

    /// Helm release name
    #[arg(long)]
    release_name: Option<String>,

    /// Chart directory, relative to the working directory [default: ./helm]
    #[arg(long)]
    chart_dir: Option<String>,

    /// Target namespace [default: default]
    #[arg(long, short = 'n')]
    namespace: Option<String>,

    /// Git remote to clone
    #[arg(long)]
    repo_url: Option<String>,

    /// Checkout directory [default: derived from --repo-url]
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// What to do when the working directory exists: clone, reuse, reset [default: clone]
    #[arg(long)]
    sync: Option<SyncPolicy>,

    /// Run the test stage as part of the full pipeline
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    run_tests: Option<bool>,

    /// Run a single stage: clone, checkout, clean, test, build, upgrade
    #[arg(long)]
    action: Option<Stage>,

    /// Config file [default: ./rollout.toml if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print each command instead of running it
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                // arch-lint: allow(no-silent-result-drop) reason="an unset or unparsable RUST_LOG falls back to the info level"
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse_from(args::normalize(std::env::args_os()));

    commands::deploy(cli.into()).await
}

impl From<Cli> for commands::DeployArgs {
    fn from(cli: Cli) -> Self {
        Self {
            overrides: rollout_core::Overrides {
                commit: cli.commit,
                image_version: cli.image_version,
                repo_url: cli.repo_url,
                work_dir: cli.work_dir,
                image_name: cli.image_name,
                release_name: cli.release_name,
                chart_dir: cli.chart_dir,
                namespace: cli.namespace,
                sync: cli.sync,
                run_tests: cli.run_tests,
            },
            action: cli.action,
            config: cli.config,
            dry_run: cli.dry_run,
        }
    }
}
