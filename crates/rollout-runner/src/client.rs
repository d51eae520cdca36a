use crate::executor::{RealExecutor, ToolExecutor};
use crate::tool::{Invocation, ToolError};
use rollout_core::{ImageTag, ReleaseTarget, ToolsConfig};
use std::path::Path;

/// Chart value overridden with the new image version on upgrade.
pub const IMAGE_VERSION_VALUE: &str = "deployment.image.version";

/// git / build-tool / helm operations, parameterized over the executor for testability.
pub struct ToolClient<E: ToolExecutor = RealExecutor> {
    executor: E,
    tools: ToolsConfig,
}

impl ToolClient<RealExecutor> {
    pub fn new(tools: ToolsConfig) -> Self {
        Self {
            executor: RealExecutor,
            tools,
        }
    }
}

impl<E: ToolExecutor> ToolClient<E> {
    pub fn with_executor(executor: E, tools: ToolsConfig) -> Self {
        Self { executor, tools }
    }

    // ── git ──

    /// `git clone <url> <dir>`, run from the current directory.
    pub async fn clone_repo(&self, repo_url: &str, work_dir: &Path) -> Result<(), ToolError> {
        let inv = Invocation::new(&self.tools.git)
            .args(["clone", repo_url])
            .arg(work_dir.to_string_lossy());
        self.executor.exec_streaming(&inv).await
    }

    /// Discard tracked modifications, then untracked and ignored files.
    pub async fn reset_tree(&self, work_dir: &Path) -> Result<(), ToolError> {
        let reset = Invocation::new(&self.tools.git)
            .args(["reset", "--hard"])
            .current_dir(work_dir);
        self.executor.exec_streaming(&reset).await?;

        let clean = Invocation::new(&self.tools.git)
            .args(["clean", "-fdx"])
            .current_dir(work_dir);
        self.executor.exec_streaming(&clean).await
    }

    pub async fn checkout(&self, commit: &str, work_dir: &Path) -> Result<(), ToolError> {
        let inv = Invocation::new(&self.tools.git)
            .args(["checkout", commit])
            .current_dir(work_dir);
        self.executor.exec_streaming(&inv).await
    }

    // ── Build tool ──

    pub async fn clean_build(&self, work_dir: &Path) -> Result<(), ToolError> {
        let inv = Invocation::new(&self.tools.build)
            .arg("clean")
            .current_dir(work_dir);
        self.executor.exec_streaming(&inv).await
    }

    pub async fn run_tests(&self, work_dir: &Path) -> Result<(), ToolError> {
        let inv = Invocation::new(&self.tools.build)
            .arg("test")
            .current_dir(work_dir);
        self.executor.exec_streaming(&inv).await
    }

    /// Package the application into a local container image named `image`.
    pub async fn build_image(&self, image: &ImageTag, work_dir: &Path) -> Result<(), ToolError> {
        let inv = Invocation::new(&self.tools.build)
            .arg("bootBuildImage")
            .arg(format!("--imageName={image}"))
            .current_dir(work_dir);
        self.executor.exec_streaming(&inv).await
    }

    // ── helm ──

    /// `helm upgrade --install`, so a missing release is installed.
    pub async fn upgrade_release(
        &self,
        release: &ReleaseTarget,
        work_dir: &Path,
    ) -> Result<(), ToolError> {
        let value = format!(
            "{IMAGE_VERSION_VALUE}={version}",
            version = release.image_version
        );
        let inv = Invocation::new(&self.tools.helm)
            .args([
                "upgrade",
                "--install",
                release.name.as_str(),
                release.chart_dir.as_str(),
                "--set",
                value.as_str(),
                "--namespace",
                release.namespace.as_str(),
            ])
            .current_dir(work_dir);
        self.executor.exec_streaming(&inv).await
    }
}
