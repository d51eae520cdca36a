//! Core types and configuration for rollout.
//!
//! This crate defines the `rollout.toml` schema ([`RolloutConfig`]), the
//! pipeline [`Stage`]s, deploy parameter layering and validation
//! ([`DeployConfig`], [`DeployPlan`]), and shared error types.

pub mod config;
pub mod deploy;
pub mod error;
pub mod image;
pub mod stage;

pub use config::{DEFAULT_CONFIG_FILE, DeploySection, RolloutConfig, SyncPolicy, ToolsConfig};
pub use deploy::{DeployConfig, DeployPlan, Overrides, ReleaseTarget, Step};
pub use error::{Error, Result};
pub use image::ImageTag;
pub use stage::{Stage, StageSelection};
