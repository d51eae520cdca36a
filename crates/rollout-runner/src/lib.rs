//! External tool invocations and the deploy pipeline for rollout.
//!
//! # Deploy pipeline
//!
//! ```text
//! rollout
//!   1. Sync      ── git clone <url> <dir>   (or skip / git reset --hard + git clean -fdx)
//!   2. Checkout  ── git checkout <commit>
//!   3. Clean     ── ./gradlew clean
//!   4. Test      ── ./gradlew test          (only with --run-tests or --action test)
//!   5. Build     ── ./gradlew bootBuildImage --imageName=<name>:<tag>
//!   6. Upgrade   ── helm upgrade --install <release> <chart> --set deployment.image.version=<tag>
//! ```

pub mod client;
pub mod executor;
pub mod pipeline;
pub mod tool;

pub use client::{IMAGE_VERSION_VALUE, ToolClient};
pub use executor::{DryRunExecutor, RealExecutor, ToolExecutor};
pub use pipeline::{Event, Pipeline, PipelineError, PipelineOutcome, SyncOutcome};
pub use tool::{Invocation, ToolError};
