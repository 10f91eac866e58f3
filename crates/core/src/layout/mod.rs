//! Vertical placement of genotype bands.
//!
//! Every policy writes into the same [`Layout`]: one interval per
//! `(timepoint, genotype)` in the unit square. Only genotypes that are
//! present, replaced, emerging or disappearing at a timepoint get an entry.

mod centred;
mod order;
mod shift;
mod spaced;
mod stacked;
pub mod width;

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use timesweep_protocol::{GenotypeId, GenotypePosition, LayoutInterval, TimesweepConfig};

use crate::model::{GenotypeTree, PrevalenceTable};

pub use order::layout_order;
pub use shift::co_emergent_ancestors;
pub use width::{Width, WidthTable};

/// Per-timepoint interval maps, indexed by timepoint position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    timepoints: Vec<String>,
    columns: Vec<BTreeMap<GenotypeId, LayoutInterval>>,
}

impl Layout {
    pub fn new(timepoints: &[String]) -> Self {
        Self {
            timepoints: timepoints.to_vec(),
            columns: vec![BTreeMap::new(); timepoints.len()],
        }
    }

    pub fn timepoints(&self) -> &[String] {
        &self.timepoints
    }

    pub fn len(&self) -> usize {
        self.timepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timepoints.is_empty()
    }

    pub fn get(&self, tp: usize, genotype: &str) -> Option<&LayoutInterval> {
        self.columns.get(tp)?.get(genotype)
    }

    pub fn get_mut(&mut self, tp: usize, genotype: &str) -> Option<&mut LayoutInterval> {
        self.columns.get_mut(tp)?.get_mut(genotype)
    }

    pub fn insert(&mut self, tp: usize, genotype: &GenotypeId, interval: LayoutInterval) {
        if let Some(column) = self.columns.get_mut(tp) {
            column.insert(genotype.clone(), interval);
        }
    }

    /// All intervals at one timepoint.
    pub fn column(&self, tp: usize) -> impl Iterator<Item = (&GenotypeId, &LayoutInterval)> {
        self.columns.get(tp).into_iter().flatten()
    }

    fn column_mut(&mut self, tp: usize) -> impl Iterator<Item = &mut LayoutInterval> {
        self.columns.get_mut(tp).into_iter().flat_map(|c| c.values_mut())
    }
}

/// Everything a layout policy reads. Borrowed, never mutated.
pub struct LayoutEngine<'a> {
    tree: &'a GenotypeTree,
    prevalence: &'a PrevalenceTable,
    widths: &'a WidthTable,
    order: Vec<GenotypeId>,
    rank: HashMap<GenotypeId, usize>,
    config: &'a TimesweepConfig,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(
        tree: &'a GenotypeTree,
        prevalence: &'a PrevalenceTable,
        widths: &'a WidthTable,
        config: &'a TimesweepConfig,
    ) -> Self {
        let order = layout_order(tree, prevalence, config.sort_gtypes);
        let rank = order
            .iter()
            .enumerate()
            .map(|(i, g)| (g.clone(), i))
            .collect();
        Self {
            tree,
            prevalence,
            widths,
            order,
            rank,
            config,
        }
    }

    /// Depth-first genotype order shared by every policy and the paths.
    pub fn order(&self) -> &[GenotypeId] {
        &self.order
    }

    /// Run the configured policy, then resolve simultaneous emergences.
    pub fn run(&self) -> Layout {
        let mut layout = match self.config.genotype_position {
            GenotypePosition::Centre => centred::layout(self),
            GenotypePosition::Stack => stacked::layout(self),
            GenotypePosition::Space => spaced::layout(self),
        };
        shift::shift_emergences(&mut layout, self.tree, &self.order);
        for tp in 0..layout.len() {
            tracing::trace!(
                timepoint = %layout.timepoints()[tp],
                intervals = layout.column(tp).count(),
                "laid out timepoint"
            );
        }
        layout
    }

    fn timepoint_count(&self) -> usize {
        self.prevalence.timepoints().len()
    }

    fn observed(&self, tp: usize, genotype: &str) -> Option<f64> {
        self.prevalence.get(tp, genotype)
    }

    /// The genotype or one of its descendants is observed at `tp`.
    fn lineage_present(&self, tp: usize, genotype: &str) -> bool {
        self.prevalence.is_observed(tp, genotype)
            || self
                .tree
                .descendants_of(genotype)
                .iter()
                .any(|d| self.prevalence.is_observed(tp, d))
    }

    /// Children of `genotype` in layout order.
    fn ordered_children(&self, genotype: &str) -> Vec<&'a GenotypeId> {
        let mut children: Vec<&GenotypeId> = self.tree.children_of(genotype).iter().collect();
        children.sort_by_key(|c| self.rank.get(*c).copied().unwrap_or(usize::MAX));
        children
    }
}
