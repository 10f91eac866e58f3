use serde::{Deserialize, Serialize};

use crate::config::TimesweepConfig;
use crate::genotype_id::GenotypeId;
use crate::types::Color;

/// One ancestry edge: `source` is the parent of `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEdge {
    pub source: GenotypeId,
    pub target: GenotypeId,
}

impl TreeEdge {
    pub fn new(source: impl Into<GenotypeId>, target: impl Into<GenotypeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A single prevalence observation of one genotype at one timepoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrevalenceRecord {
    pub timepoint: String,
    pub clone_id: GenotypeId,
    pub clonal_prev: f64,
}

impl PrevalenceRecord {
    pub fn new(timepoint: impl Into<String>, clone_id: impl Into<GenotypeId>, prev: f64) -> Self {
        Self {
            timepoint: timepoint.into(),
            clone_id: clone_id.into(),
            clonal_prev: prev,
        }
    }
}

/// A bottleneck event (e.g. a treatment) occurring between `prev_tp` and the
/// timepoint that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerturbationEvent {
    pub prev_tp: String,
    /// Fraction of the population surviving the event, in `(0, 1]`.
    pub frac: f64,
}

/// A user-chosen colour for one genotype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloneColour {
    pub clone_id: GenotypeId,
    pub colour: Color,
}

/// The complete input document handed to the layout pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimesweepInput {
    pub tree_edges: Vec<TreeEdge>,
    pub clonal_prev: Vec<PrevalenceRecord>,
    #[serde(default)]
    pub perturbations: Vec<PerturbationEvent>,
    /// Explicit chronological order of timepoints. When absent, the order of
    /// first appearance in `clonal_prev` is used.
    #[serde(default)]
    pub timepoints: Option<Vec<String>>,
    #[serde(default)]
    pub clone_cols: Vec<CloneColour>,
    #[serde(default)]
    pub config: TimesweepConfig,
}
