use std::collections::HashMap;

use serde::Serialize;
use timesweep_protocol::GenotypeId;

use crate::error::LayoutWarning;
use crate::model::{GenotypeTree, PrevalenceTable};

/// Threshold-adjusted thickness of one genotype at one timepoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Width {
    /// Own share of the band.
    pub effective_prevalence: f64,
    /// Own share plus the widths of every child.
    pub width: f64,
}

/// How much each at-or-above-threshold genotype gives up at one timepoint to
/// pay for the inflation of sub-threshold genotypes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Redistribution {
    threshold: f64,
    share: f64,
    /// True when inflation exists but nothing can absorb it.
    hazard: bool,
}

impl Redistribution {
    /// Every observation at the timepoint takes part, including genotypes
    /// missing from the tree.
    fn at(prevalence: &PrevalenceTable, tp: usize, threshold: f64) -> Self {
        let mut inflation = 0.0;
        let mut donors = 0usize;
        for &p in prevalence.at(tp).into_iter().flat_map(|c| c.values()) {
            if p < threshold {
                inflation += threshold - p;
            } else {
                donors += 1;
            }
        }
        let hazard = donors == 0 && inflation > 0.0;
        let share = if donors == 0 {
            0.0
        } else {
            inflation / donors as f64
        };
        Self {
            threshold,
            share,
            hazard,
        }
    }

    /// Returns the effective prevalence and whether it had to be clamped.
    fn effective(&self, observed: Option<f64>) -> (f64, bool) {
        match observed {
            None => (0.0, false),
            Some(p) if p < self.threshold => (self.threshold, false),
            Some(p) => {
                let e = p - self.share;
                if e < 0.0 { (0.0, true) } else { (e, false) }
            }
        }
    }
}

/// Width of `genotype` at timepoint index `tp`, computed directly from the
/// recursive definition.
pub fn width(
    tree: &GenotypeTree,
    prevalence: &PrevalenceTable,
    tp: usize,
    genotype: &str,
    threshold: f64,
) -> Width {
    let redistribution = Redistribution::at(prevalence, tp, threshold);
    width_with(tree, prevalence, tp, genotype, &redistribution)
}

fn width_with(
    tree: &GenotypeTree,
    prevalence: &PrevalenceTable,
    tp: usize,
    genotype: &str,
    redistribution: &Redistribution,
) -> Width {
    let (effective_prevalence, _) = redistribution.effective(prevalence.get(tp, genotype));
    let mut width = effective_prevalence;
    for child in tree.children_of(genotype) {
        width += width_with(tree, prevalence, tp, child, redistribution).width;
    }
    Width {
        effective_prevalence,
        width,
    }
}

/// Widths of every tree genotype at every timepoint.
#[derive(Debug, Clone, Default)]
pub struct WidthTable {
    columns: Vec<HashMap<GenotypeId, Width>>,
    warnings: Vec<LayoutWarning>,
}

impl WidthTable {
    pub fn compute(tree: &GenotypeTree, prevalence: &PrevalenceTable, threshold: f64) -> Self {
        let mut table = Self::default();
        for (tp, label) in prevalence.timepoints().iter().enumerate() {
            let redistribution = Redistribution::at(prevalence, tp, threshold);
            if redistribution.hazard {
                table.warnings.push(LayoutWarning::DivisionHazard {
                    timepoint: label.clone(),
                });
            }
            let mut column = HashMap::new();
            fill(
                tree,
                prevalence,
                tp,
                tree.root(),
                &redistribution,
                &mut column,
                &mut |genotype| {
                    table.warnings.push(LayoutWarning::NegativeEffectivePrevalence {
                        timepoint: label.clone(),
                        genotype: genotype.clone(),
                    });
                },
            );
            table.columns.push(column);
        }
        table
    }

    pub fn get(&self, tp: usize, genotype: &str) -> Width {
        self.columns
            .get(tp)
            .and_then(|c| c.get(genotype))
            .copied()
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }
}

/// Post-order fill of one timepoint column.
fn fill(
    tree: &GenotypeTree,
    prevalence: &PrevalenceTable,
    tp: usize,
    genotype: &GenotypeId,
    redistribution: &Redistribution,
    column: &mut HashMap<GenotypeId, Width>,
    on_clamp: &mut dyn FnMut(&GenotypeId),
) -> f64 {
    let (effective_prevalence, clamped) = redistribution.effective(prevalence.get(tp, genotype));
    if clamped {
        on_clamp(genotype);
    }
    let mut width = effective_prevalence;
    for child in tree.children_of(genotype) {
        width += fill(tree, prevalence, tp, child, redistribution, column, on_clamp);
    }
    column.insert(
        genotype.clone(),
        Width {
            effective_prevalence,
            width,
        },
    );
    width
}
