use timesweep_protocol::{GenotypeId, IntervalState};

use super::Layout;
use crate::model::GenotypeTree;

/// Ancestors of `genotype` that also emerge at timepoint index `tp`,
/// outermost first.
pub fn co_emergent_ancestors<'t>(
    layout: &Layout,
    tree: &'t GenotypeTree,
    tp: usize,
    genotype: &str,
) -> Vec<&'t GenotypeId> {
    tree.ancestors_of(genotype)
        .iter()
        .filter(|a| {
            layout
                .get(tp, a)
                .is_some_and(|iv| iv.state == IntervalState::Emerges)
        })
        .collect()
}

/// Fan out genotypes of one lineage that emerge at the same timepoint.
///
/// A timepoint with any emergence gets `longest co-emergent chain + 2`
/// horizontal slots (the outer two stay free), written on every interval
/// there. Each emerging genotype sits one slot right of its deepest
/// co-emergent ancestor.
pub(super) fn shift_emergences(layout: &mut Layout, tree: &GenotypeTree, order: &[GenotypeId]) {
    for tp in 0..layout.len() {
        let chains: Vec<(&GenotypeId, usize)> = order
            .iter()
            .rev()
            .filter(|g| {
                layout
                    .get(tp, g)
                    .is_some_and(|iv| iv.state == IntervalState::Emerges)
            })
            .map(|g| (g, co_emergent_ancestors(layout, tree, tp, g).len()))
            .collect();
        let Some(longest) = chains.iter().map(|&(_, n)| n).max() else {
            continue;
        };

        let partitions = longest as u32 + 2;
        for interval in layout.column_mut(tp) {
            interval.n_partitions = Some(partitions);
        }
        for (genotype, depth) in chains {
            if let Some(interval) = layout.get_mut(tp, genotype) {
                interval.x_shift = Some((depth + 1) as f64 / f64::from(partitions));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use timesweep_protocol::{GenotypePosition, TimesweepConfig};

    use crate::layout::fixtures::{prevalence, tree};
    use crate::layout::{LayoutEngine, WidthTable};

    #[test]
    fn descendants_fan_out_to_the_right() {
        // R, A and B all appear at T1, so all three are born at T0.
        let t = tree(&[("R", "A"), ("A", "B"), ("R", "C")]);
        let p = prevalence(&[
            ("T1", "R", 0.4),
            ("T1", "A", 0.3),
            ("T1", "B", 0.3),
            ("T2", "R", 0.5),
            ("T2", "C", 0.5),
        ]);
        for position in [GenotypePosition::Stack, GenotypePosition::Centre, GenotypePosition::Space] {
            let cfg = TimesweepConfig {
                genotype_position: position,
                threshold: 0.01,
                ..TimesweepConfig::default()
            };
            let widths = WidthTable::compute(&t, &p, cfg.threshold);
            let layout = LayoutEngine::new(&t, &p, &widths, &cfg).run();

            let shift = |g: &str| layout.get(0, g).and_then(|iv| iv.x_shift);
            assert_eq!(layout.get(0, "R").and_then(|iv| iv.n_partitions), Some(4));
            assert_eq!(shift("R"), Some(0.25));
            assert_eq!(shift("A"), Some(0.5));
            assert_eq!(shift("B"), Some(0.75));

            // C emerges alone at T1; every interval there learns the slot count.
            assert_eq!(layout.get(1, "C").and_then(|iv| iv.x_shift), Some(0.5));
            assert_eq!(layout.get(1, "R").and_then(|iv| iv.n_partitions), Some(2));
            assert_eq!(layout.get(2, "R").and_then(|iv| iv.n_partitions), None);
        }
    }
}
