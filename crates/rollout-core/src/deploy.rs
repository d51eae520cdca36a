//! Deploy configuration layering and validation.
//!
//! Values are resolved as built-in defaults < `rollout.toml` < command-line
//! [`Overrides`]. [`DeployConfig::plan`] then checks every selected stage's
//! parameters before anything runs and produces a [`DeployPlan`] whose
//! steps carry only non-empty values.

use std::path::{Path, PathBuf};

use crate::config::{RolloutConfig, SyncPolicy, ToolsConfig};
use crate::image::ImageTag;
use crate::stage::{Stage, StageSelection};

/// Per-run values from the command line. `None` keeps the value from the
/// config file or the built-in default. A flag given with an empty value
/// still wins, and [`DeployConfig::plan`] rejects it for any stage that
/// consumes it.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub commit: Option<String>,
    pub image_version: Option<String>,
    pub repo_url: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub image_name: Option<String>,
    pub release_name: Option<String>,
    pub chart_dir: Option<String>,
    pub namespace: Option<String>,
    pub sync: Option<SyncPolicy>,
    pub run_tests: Option<bool>,
}

/// Fully layered deploy parameters, not yet validated against a stage selection.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub commit: Option<String>,
    pub image_version: Option<String>,
    pub repo_url: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub image_name: Option<String>,
    pub release_name: Option<String>,
    pub chart_dir: String,
    pub namespace: String,
    pub sync: SyncPolicy,
    pub run_tests: bool,
    pub tools: ToolsConfig,
}

/// Helm release coordinates for the upgrade stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    pub name: String,
    pub chart_dir: String,
    pub namespace: String,
    /// Value written to `deployment.image.version`
    pub image_version: String,
}

/// A validated stage with the parameters it consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Sync { repo_url: String, policy: SyncPolicy },
    Checkout { commit: String },
    Clean,
    Test,
    Build { image: ImageTag },
    Upgrade { release: ReleaseTarget },
}

impl Step {
    pub fn stage(&self) -> Stage {
        match self {
            Step::Sync { .. } => Stage::Clone,
            Step::Checkout { .. } => Stage::Checkout,
            Step::Clean => Stage::Clean,
            Step::Test => Stage::Test,
            Step::Build { .. } => Stage::Build,
            Step::Upgrade { .. } => Stage::Upgrade,
        }
    }
}

/// Ordered, validated steps plus the context they share.
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub work_dir: PathBuf,
    pub tools: ToolsConfig,
    pub steps: Vec<Step>,
}

impl DeployPlan {
    pub fn stages(&self) -> Vec<Stage> {
        self.steps.iter().map(Step::stage).collect()
    }
}

impl DeployConfig {
    /// Merge the config file with command-line overrides.
    pub fn from_layers(file: RolloutConfig, overrides: Overrides) -> Self {
        let deploy = file.deploy;
        Self {
            commit: overrides.commit,
            image_version: overrides.image_version,
            repo_url: overrides.repo_url.or(deploy.repo_url),
            work_dir: overrides
                .work_dir
                .filter(|p| !p.as_os_str().is_empty())
                .or(deploy.work_dir),
            image_name: overrides.image_name.or(deploy.image_name),
            release_name: overrides.release_name.or(deploy.release_name),
            chart_dir: layered(overrides.chart_dir, deploy.chart_dir),
            namespace: layered(overrides.namespace, deploy.namespace),
            sync: layered(overrides.sync, deploy.sync),
            run_tests: layered(overrides.run_tests, deploy.run_tests),
            tools: file.tools,
        }
    }

    /// Image version for the build and upgrade stages: `--image-version`
    /// when given, otherwise the commit.
    fn tag_version(&self, stage: Stage) -> crate::Result<String> {
        match self.image_version.as_deref() {
            Some(version) => require(stage, "--image-version", Some(version)),
            None => require(stage, "--image-version or --commit", self.commit.as_deref()),
        }
    }

    /// Working directory: `--work-dir`, else derived from the repository
    /// URL, else the current directory.
    pub fn resolve_work_dir(&self) -> crate::Result<PathBuf> {
        if let Some(dir) = &self.work_dir {
            return Ok(dir.clone());
        }
        match self.repo_url.as_deref() {
            Some(url) => derive_work_dir(url).ok_or_else(|| crate::Error::WorkDirUnresolved {
                repo_url: url.to_owned(),
            }),
            None => Ok(PathBuf::from(".")),
        }
    }

    /// Validate the parameters of every selected stage and build the plan.
    ///
    /// # Errors
    ///
    /// [`crate::Error::MissingParameter`] for the first stage (in pipeline
    /// order) lacking a value; [`crate::Error::WorkDirUnresolved`] if the
    /// repository URL has no usable final path segment.
    pub fn plan(&self, selection: StageSelection) -> crate::Result<DeployPlan> {
        let stages = selection.stages(self.run_tests);
        let mut steps = Vec::with_capacity(stages.len());

        for stage in stages {
            let step = match stage {
                Stage::Clone => Step::Sync {
                    repo_url: require(stage, "--repo-url", self.repo_url.as_deref())?,
                    policy: self.sync,
                },
                Stage::Checkout => Step::Checkout {
                    commit: require(stage, "--commit", self.commit.as_deref())?,
                },
                Stage::Clean => Step::Clean,
                Stage::Test => Step::Test,
                Stage::Build => {
                    let name = require(stage, "--image-name", self.image_name.as_deref())?;
                    Step::Build {
                        image: ImageTag::new(name, self.tag_version(stage)?),
                    }
                }
                Stage::Upgrade => Step::Upgrade {
                    release: ReleaseTarget {
                        name: require(stage, "--release-name", self.release_name.as_deref())?,
                        chart_dir: require(stage, "--chart-dir", Some(self.chart_dir.as_str()))?,
                        namespace: require(stage, "--namespace", Some(self.namespace.as_str()))?,
                        image_version: self.tag_version(stage)?,
                    },
                },
            };
            steps.push(step);
        }

        let work_dir = self.resolve_work_dir()?;
        tracing::debug!(
            work_dir = %work_dir.display(),
            steps = steps.len(),
            "deploy plan validated"
        );

        Ok(DeployPlan {
            work_dir,
            tools: self.tools.clone(),
            steps,
        })
    }
}

fn require(stage: Stage, parameter: &'static str, value: Option<&str>) -> crate::Result<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or(crate::Error::MissingParameter { stage, parameter })
}

fn layered<T>(flag: Option<T>, file: T) -> T {
    match flag {
        Some(value) => value,
        None => file,
    }
}

/// `https://host/org/app.git` → `./app`; `git@host:org/app` → `./app`.
fn derive_work_dir(repo_url: &str) -> Option<PathBuf> {
    let last = repo_url.trim_end_matches('/').rsplit(['/', ':']).next()?;
    let name = match last.strip_suffix(".git") {
        Some(stem) => stem,
        None => last,
    };
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(Path::new(".").join(name))
}
