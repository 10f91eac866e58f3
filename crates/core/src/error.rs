use serde::Serialize;
use thiserror::Error;
use timesweep_protocol::{ConfigError, GenotypeId};

use crate::model::{PrevalenceError, TreeError};

#[derive(Debug, Error)]
pub enum TimesweepError {
    #[error("malformed tree: {0}")]
    Tree(#[from] TreeError),
    #[error("prevalence: {0}")]
    Prevalence(#[from] PrevalenceError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("input document: {0}")]
    Json(#[from] serde_json::Error),
}

/// A data gap the pipeline absorbed instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutWarning {
    /// In the tree but never observed; laid out with zero width.
    MissingPrevalence { genotype: GenotypeId },
    /// Observed but absent from the tree; ignored.
    UnknownGenotype { genotype: GenotypeId },
    /// Everything at the timepoint is below threshold, so nothing can shrink
    /// to pay for the inflation.
    DivisionHazard { timepoint: String },
    NegativeEffectivePrevalence { timepoint: String, genotype: GenotypeId },
    UnknownPerturbationTimepoint { timepoint: String },
}

impl LayoutWarning {
    /// Emit the warning as a tracing event.
    pub fn log(&self) {
        tracing::warn!("{self}");
    }
}

impl std::fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPrevalence { genotype } => {
                write!(f, "genotype {genotype} has no prevalence observations")
            }
            Self::UnknownGenotype { genotype } => {
                write!(f, "prevalence recorded for genotype {genotype}, which is not in the tree")
            }
            Self::DivisionHazard { timepoint } => write!(
                f,
                "every genotype at {timepoint} is below threshold; inflation not redistributed"
            ),
            Self::NegativeEffectivePrevalence {
                timepoint,
                genotype,
            } => write!(
                f,
                "redistribution pushed {genotype} below zero at {timepoint}; clamped"
            ),
            Self::UnknownPerturbationTimepoint { timepoint } => write!(
                f,
                "perturbation after {timepoint} ignored: no such timepoint or nothing follows it"
            ),
        }
    }
}
