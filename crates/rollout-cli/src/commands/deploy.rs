use rollout_core::{DeployConfig, Overrides, RolloutConfig, Stage, StageSelection, Step};
use rollout_runner::{DryRunExecutor, Event, Pipeline, ToolClient, ToolExecutor};
use std::path::{Path, PathBuf};

pub struct DeployArgs {
    pub overrides: Overrides,
    pub action: Option<Stage>,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
}

/// Run the full deploy pipeline, or the single stage named by `--action`.
pub async fn deploy(args: DeployArgs) -> anyhow::Result<()> {
    let file = match &args.config {
        Some(path) => RolloutConfig::load(path)?,
        None => RolloutConfig::discover(Path::new("."))?,
    };
    let config = DeployConfig::from_layers(file, args.overrides);
    let selection = args
        .action
        .map_or(StageSelection::All, StageSelection::Only);

    if args.dry_run {
        let client = ToolClient::with_executor(DryRunExecutor, config.tools.clone());
        run(&Pipeline::with_client(client), &config, selection).await?;
    } else {
        run(&Pipeline::new(config.tools.clone()), &config, selection).await?;
    }

    match selection {
        StageSelection::All => println!("Deployment successful."),
        StageSelection::Only(stage) => println!("Stage {stage} completed."),
    }

    Ok(())
}

/// Validates every selected stage before the first command runs.
async fn run<E: ToolExecutor>(
    pipeline: &Pipeline<E>,
    config: &DeployConfig,
    selection: StageSelection,
) -> anyhow::Result<()> {
    let outcome = pipeline.deploy(config, selection, print_progress).await?;
    tracing::debug!(
        completed = outcome.completed.len(),
        image = ?outcome.image.as_ref().map(ToString::to_string),
        "pipeline finished"
    );
    Ok(())
}

fn print_progress(event: Event<'_>) {
    match event {
        Event::Cloning { repo_url, work_dir } => {
            println!(
                "Cloning repository from {repo_url} into {}...",
                work_dir.display()
            );
        }
        Event::CloneSkipped { work_dir } => {
            println!(
                "Working directory {} exists, skipping clone",
                work_dir.display()
            );
        }
        Event::Resetting { work_dir } => {
            println!(
                "Working directory {} exists, discarding local changes...",
                work_dir.display()
            );
        }
        Event::Starting { step, .. } => match step {
            // Sync reports through Cloning / CloneSkipped / Resetting.
            Step::Sync { .. } => {}
            Step::Checkout { commit } => println!("Checking out commit: {commit}"),
            Step::Clean => println!("Cleaning build artifacts..."),
            Step::Test => println!("Running tests..."),
            Step::Build { image } => println!("Building image: {image}"),
            Step::Upgrade { release } => println!(
                "Upgrading release {name} in namespace {ns} with image version: {version}",
                name = release.name,
                ns = release.namespace,
                version = release.image_version,
            ),
        },
        Event::Finished { .. } => {}
    }
}
