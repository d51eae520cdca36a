use std::path::PathBuf;

use crate::stage::Stage;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config file {0} does not exist")]
    ConfigNotFound(PathBuf),

    // ── Deploy parameters ──
    #[error("{parameter} is required for the {stage} stage")]
    MissingParameter {
        stage: Stage,
        parameter: &'static str,
    },

    #[error("cannot derive a working directory from repository URL {repo_url:?}; pass --work-dir")]
    WorkDirUnresolved { repo_url: String },

    #[error("unknown stage {0:?}; expected one of: {names}", names = Stage::names())]
    UnknownStage(String),

    #[error("unknown sync policy {0:?}; expected one of: clone, reuse, reset")]
    UnknownSyncPolicy(String),
}
