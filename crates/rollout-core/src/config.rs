use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// File name looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "rollout.toml";

/// rollout.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolloutConfig {
    #[serde(default)]
    pub deploy: DeploySection,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploySection {
    /// Git remote to clone
    pub repo_url: Option<String>,
    /// Local checkout directory (defaults to the repository name)
    pub work_dir: Option<PathBuf>,
    /// Container image name
    pub image_name: Option<String>,
    /// Helm release name
    pub release_name: Option<String>,
    /// Chart path, relative to the working directory
    #[serde(default = "default_chart_dir")]
    pub chart_dir: String,
    /// Target namespace
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// What repository sync does with an existing working directory
    #[serde(default)]
    pub sync: SyncPolicy,
    /// Run the test stage as part of the full pipeline
    #[serde(default)]
    pub run_tests: bool,
}

/// Programs invoked by each stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Version-control executable
    #[serde(default = "default_git")]
    pub git: String,
    /// Build-tool wrapper, resolved relative to the working directory
    #[serde(default = "default_build")]
    pub build: String,
    /// Release-management executable
    #[serde(default = "default_helm")]
    pub helm: String,
}

/// How repository sync treats a working directory that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPolicy {
    /// Always clone; git refuses a non-empty target.
    #[default]
    Clone,
    /// Skip the clone and use the directory as-is.
    Reuse,
    /// Skip the clone, then discard local changes and untracked files.
    Reset,
}

impl FromStr for SyncPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clone" => Ok(Self::Clone),
            "reuse" => Ok(Self::Reuse),
            "reset" => Ok(Self::Reset),
            other => Err(crate::Error::UnknownSyncPolicy(other.to_owned())),
        }
    }
}

impl Default for DeploySection {
    fn default() -> Self {
        Self {
            repo_url: None,
            work_dir: None,
            image_name: None,
            release_name: None,
            chart_dir: default_chart_dir(),
            namespace: default_namespace(),
            sync: SyncPolicy::default(),
            run_tests: false,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: default_git(),
            build: default_build(),
            helm: default_helm(),
        }
    }
}

impl RolloutConfig {
    /// Load `rollout.toml` from the given directory, or return defaults if not found.
    pub fn discover(dir: &Path) -> crate::Result<Self> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    /// Load an explicitly named config file, which must exist.
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Err(crate::Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn default_chart_dir() -> String {
    "./helm".to_owned()
}

fn default_namespace() -> String {
    "default".to_owned()
}

fn default_git() -> String {
    "git".to_owned()
}

fn default_build() -> String {
    "./gradlew".to_owned()
}

fn default_helm() -> String {
    "helm".to_owned()
}
