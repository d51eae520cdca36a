//! Sequential, fail-fast execution of a [`DeployPlan`].
//!
//! Each step awaits its tool to completion before the next begins. The first
//! failing step ends the run; later steps never start and nothing is rolled
//! back.

use crate::client::ToolClient;
use crate::executor::{RealExecutor, ToolExecutor};
use crate::tool::ToolError;
use rollout_core::{
    DeployConfig, DeployPlan, ImageTag, Stage, StageSelection, Step, SyncPolicy, ToolsConfig,
};
use std::path::Path;

/// Progress notifications, emitted in execution order.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A step is about to run.
    Starting { step: &'a Step, work_dir: &'a Path },
    /// Repository sync is cloning into a fresh working directory.
    Cloning {
        repo_url: &'a str,
        work_dir: &'a Path,
    },
    /// The working directory exists and the sync policy is `reuse`.
    CloneSkipped { work_dir: &'a Path },
    /// The working directory exists and the sync policy is `reset`.
    Resetting { work_dir: &'a Path },
    /// A step's tool exited successfully.
    Finished { stage: Stage },
}

/// How repository sync ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Cloned,
    Reused,
    Reset,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutcome {
    /// Stages that completed, in order.
    pub completed: Vec<Stage>,
    /// Image built by the build stage, if it ran.
    pub image: Option<ImageTag>,
    /// What the sync stage did, if it ran.
    pub sync: Option<SyncOutcome>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] rollout_core::Error),

    #[error("{stage} stage failed")]
    Stage { stage: Stage, source: ToolError },
}

impl PipelineError {
    /// The stage that failed; `None` for configuration errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Stage { stage, .. } => Some(*stage),
            PipelineError::Config(_) => None,
        }
    }
}

pub struct Pipeline<E: ToolExecutor = RealExecutor> {
    client: ToolClient<E>,
}

impl Pipeline<RealExecutor> {
    pub fn new(tools: ToolsConfig) -> Self {
        Self {
            client: ToolClient::new(tools),
        }
    }
}

impl<E: ToolExecutor> Pipeline<E> {
    pub fn with_client(client: ToolClient<E>) -> Self {
        Self { client }
    }

    /// Validate `config` for `selection`, then run the resulting plan.
    ///
    /// Validation covers every selected stage, so a missing parameter is
    /// reported before any tool is invoked.
    pub async fn deploy(
        &self,
        config: &DeployConfig,
        selection: StageSelection,
        on_event: impl FnMut(Event<'_>),
    ) -> Result<PipelineOutcome, PipelineError> {
        let plan = config.plan(selection)?;
        self.run(&plan, on_event).await
    }

    /// Run every step of `plan` in order, stopping at the first failure.
    pub async fn run(
        &self,
        plan: &DeployPlan,
        mut on_event: impl FnMut(Event<'_>),
    ) -> Result<PipelineOutcome, PipelineError> {
        let work_dir = plan.work_dir.as_path();
        let mut outcome = PipelineOutcome::default();

        for step in &plan.steps {
            let stage = step.stage();
            on_event(Event::Starting { step, work_dir });
            tracing::debug!(%stage, work_dir = %work_dir.display(), "stage starting");

            let result = match step {
                Step::Sync { repo_url, policy } => self
                    .sync(repo_url, *policy, work_dir, &mut on_event)
                    .await
                    .map(|sync| outcome.sync = Some(sync)),
                Step::Checkout { commit } => self.client.checkout(commit, work_dir).await,
                Step::Clean => self.client.clean_build(work_dir).await,
                Step::Test => self.client.run_tests(work_dir).await,
                Step::Build { image } => self
                    .client
                    .build_image(image, work_dir)
                    .await
                    .map(|()| outcome.image = Some(image.clone())),
                Step::Upgrade { release } => self.client.upgrade_release(release, work_dir).await,
            };

            result.map_err(|source| PipelineError::Stage { stage, source })?;

            outcome.completed.push(stage);
            on_event(Event::Finished { stage });
        }

        Ok(outcome)
    }

    async fn sync(
        &self,
        repo_url: &str,
        policy: SyncPolicy,
        work_dir: &Path,
        on_event: &mut impl FnMut(Event<'_>),
    ) -> Result<SyncOutcome, ToolError> {
        let exists = work_dir.exists();

        match (policy, exists) {
            (SyncPolicy::Reuse, true) => {
                tracing::info!(work_dir = %work_dir.display(), "working directory exists; skipping clone");
                on_event(Event::CloneSkipped { work_dir });
                Ok(SyncOutcome::Reused)
            }
            (SyncPolicy::Reset, true) => {
                tracing::info!(work_dir = %work_dir.display(), "working directory exists; resetting");
                on_event(Event::Resetting { work_dir });
                self.client.reset_tree(work_dir).await?;
                Ok(SyncOutcome::Reset)
            }
            _ => {
                on_event(Event::Cloning { repo_url, work_dir });
                self.client.clone_repo(repo_url, work_dir).await?;
                Ok(SyncOutcome::Cloned)
            }
        }
    }
}
