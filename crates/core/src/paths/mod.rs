//! Boundary paths for each genotype band, and their conversion to curves.

pub mod curves;
pub mod labels;
pub mod tracks;
pub mod traditional;

use std::collections::BTreeMap;

use timesweep_protocol::PerturbationEvent;

use crate::error::LayoutWarning;

pub use curves::{CurvePath, elbow, to_curves};
pub use labels::{tracks_labels, traditional_labels};
pub use tracks::tracks_paths;
pub use traditional::traditional_paths;

/// Perturbation events keyed by the index of the timepoint they follow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Perturbations {
    after: BTreeMap<usize, f64>,
}

impl Perturbations {
    /// Attach events to timepoint indices. An event naming an unknown
    /// timepoint, or the last one, has nothing to compress and is skipped.
    /// The first event after a timepoint wins.
    pub fn resolve(events: &[PerturbationEvent], timepoints: &[String]) -> (Self, Vec<LayoutWarning>) {
        let mut after = BTreeMap::new();
        let mut warnings = Vec::new();
        for event in events {
            match timepoints.iter().position(|tp| *tp == event.prev_tp) {
                Some(idx) if idx + 1 < timepoints.len() => {
                    after.entry(idx).or_insert(event.frac);
                }
                _ => warnings.push(LayoutWarning::UnknownPerturbationTimepoint {
                    timepoint: event.prev_tp.clone(),
                }),
            }
        }
        (Self { after }, warnings)
    }

    /// Surviving fraction of the event following timepoint `idx`.
    pub fn after(&self, idx: usize) -> Option<f64> {
        self.after.get(&idx).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.after.is_empty()
    }
}
