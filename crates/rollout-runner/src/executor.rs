use crate::tool::{Invocation, ToolError};
use std::path::{Path, PathBuf};

/// Abstraction over external tool execution for testability.
///
/// Production code uses [`RealExecutor`], `--dry-run` uses [`DryRunExecutor`],
/// tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait ToolExecutor: Send + Sync {
    /// Run a command to completion, streaming its output to the terminal.
    async fn exec_streaming(&self, invocation: &Invocation) -> Result<(), ToolError>;
}

/// Spawns the real programs.
pub struct RealExecutor;

impl ToolExecutor for RealExecutor {
    async fn exec_streaming(&self, invocation: &Invocation) -> Result<(), ToolError> {
        use std::process::Stdio;

        let program = resolve_program(invocation).map_err(|e| ToolError::Spawn {
            program: invocation.program.clone(),
            source: e,
        })?;

        tracing::debug!(
            program = %program.display(),
            args = ?invocation.args,
            cwd = ?invocation.cwd,
            "running command"
        );

        let mut command = tokio::process::Command::new(&program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }

        let status = command.status().await.map_err(|e| ToolError::Spawn {
            program: invocation.program.clone(),
            source: e,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolError::CommandFailed {
                invocation: invocation.clone(),
                status: status.to_string(),
            })
        }
    }
}

/// Prints each command instead of running it.
pub struct DryRunExecutor;

impl ToolExecutor for DryRunExecutor {
    async fn exec_streaming(&self, invocation: &Invocation) -> Result<(), ToolError> {
        match &invocation.cwd {
            Some(dir) => println!("[dry-run] (in {}) {invocation}", dir.display()),
            None => println!("[dry-run] {invocation}"),
        }
        Ok(())
    }
}

/// A relative program path with a directory component (`./gradlew`) names
/// a file inside the invocation's working directory. Make it absolute so
/// it does not depend on when the child changes directory.
fn resolve_program(invocation: &Invocation) -> std::io::Result<PathBuf> {
    let program = Path::new(&invocation.program);
    let has_dir_component = program.components().count() > 1;

    match &invocation.cwd {
        Some(dir) if program.is_relative() && has_dir_component => {
            std::path::absolute(dir.join(program))
        }
        _ => Ok(program.to_path_buf()),
    }
}
