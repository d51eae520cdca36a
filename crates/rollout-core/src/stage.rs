//! Pipeline stages and stage selection.
//!
//! ```text
//! clone → checkout → clean → [test] → build → upgrade
//! ```
//!
//! The order of [`Stage::ALL`] is the execution order. `test` only runs in
//! the full pipeline when tests are enabled.

use std::fmt;
use std::str::FromStr;

/// One step of the deploy pipeline, wrapping a single external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Repository sync (`git clone`, or reset/clean of an existing checkout)
    Clone,
    /// `git checkout <commit>`
    Checkout,
    /// `<build-tool> clean`
    Clean,
    /// `<build-tool> test`
    Test,
    /// `<build-tool> bootBuildImage`
    Build,
    /// `helm upgrade --install`
    Upgrade,
}

impl Stage {
    /// Every stage, in pipeline order.
    pub const ALL: [Stage; 6] = [
        Stage::Clone,
        Stage::Checkout,
        Stage::Clean,
        Stage::Test,
        Stage::Build,
        Stage::Upgrade,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Clone => "clone",
            Stage::Checkout => "checkout",
            Stage::Clean => "clean",
            Stage::Test => "test",
            Stage::Build => "build",
            Stage::Upgrade => "upgrade",
        }
    }

    /// Comma-separated list of all stage names, for diagnostics.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| crate::Error::UnknownStage(s.to_owned()))
    }
}

/// Which stages a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageSelection {
    /// The full pipeline.
    #[default]
    All,
    /// Exactly one stage (`--action`).
    Only(Stage),
}

impl StageSelection {
    /// Resolve the selection into the ordered list of stages to run.
    ///
    /// `run_tests` only affects [`StageSelection::All`]; selecting the test
    /// stage explicitly always runs it.
    pub fn stages(self, run_tests: bool) -> Vec<Stage> {
        match self {
            StageSelection::All => Stage::ALL
                .into_iter()
                .filter(|s| *s != Stage::Test || run_tests)
                .collect(),
            StageSelection::Only(stage) => vec![stage],
        }
    }
}
