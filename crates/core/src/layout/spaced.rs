use std::collections::HashSet;

use timesweep_protocol::{GenotypeId, IntervalState};

use super::{Layout, LayoutEngine};

/// Stacked layout with a gap opened between co-occurring siblings.
///
/// Siblings are repositioned top-down from the parent's top edge. The gap is
/// `min(sibling_gap, parent share / (siblings + 1))` so the gaps never eat
/// more than the parent's own share.
pub(super) fn layout(engine: &LayoutEngine<'_>) -> Layout {
    let mut layout = super::stacked::layout(engine);
    let configured = engine.config.sibling_gap;

    for tp in 0..engine.timepoint_count() {
        let prev = tp.checked_sub(1);
        let mut done: HashSet<&GenotypeId> = HashSet::new();

        for genotype in engine.order() {
            if done.contains(genotype) {
                continue;
            }
            let Some(parent) = engine.tree.parent_of(genotype) else {
                continue;
            };
            if engine.tree.is_phantom(parent) {
                continue;
            }
            let Some(parent_iv) = layout.get(tp, parent).cloned() else {
                continue;
            };

            let mut siblings: Vec<&GenotypeId> = engine
                .ordered_children(parent)
                .into_iter()
                .filter(|c| layout.get(tp, c).is_some_and(|iv| iv.state.occupies()))
                .collect();
            if siblings.is_empty() {
                continue;
            }
            siblings.reverse();

            let count = siblings.len() as f64;
            let gap = configured.min(parent_iv.effective_prevalence / (count + 1.0));
            let mut cursor = if parent_iv.height() == 0.0 {
                layout.get(tp, siblings[0]).map_or(parent_iv.top, |iv| iv.top)
            } else {
                parent_iv.top
            };

            for sibling in siblings {
                let Some(iv) = layout.get_mut(tp, sibling) else {
                    continue;
                };
                let height = iv.height();
                iv.top = cursor - gap;
                iv.bottom = iv.top - height;
                let mid = iv.midpoint();
                cursor -= height + gap;

                if let Some(p) = prev
                    && let Some(marker) = layout.get_mut(p, sibling)
                    && marker.state == IntervalState::Emerges
                {
                    marker.bottom = mid;
                    marker.top = mid;
                }
                done.insert(sibling);
            }

            if let Some(parent_iv) = layout.get_mut(tp, parent) {
                parent_iv.space = Some(count * gap);
            }
            tracing::trace!(tp, %parent, gap, "spaced siblings");
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use timesweep_protocol::{GenotypePosition, IntervalState, TimesweepConfig};

    use crate::layout::fixtures::{close, prevalence, tree};
    use crate::layout::{Layout, LayoutEngine, WidthTable};

    fn run(sibling_gap: f64, records: &[(&str, &str, f64)]) -> Layout {
        let t = tree(&[("R", "A"), ("R", "B")]);
        let p = prevalence(records);
        let cfg = TimesweepConfig {
            genotype_position: GenotypePosition::Space,
            threshold: 0.01,
            sibling_gap,
            ..TimesweepConfig::default()
        };
        let widths = WidthTable::compute(&t, &p, cfg.threshold);
        LayoutEngine::new(&t, &p, &widths, &cfg).run()
    }

    #[test]
    fn siblings_are_separated_from_the_top() {
        let layout = run(0.05, &[("T1", "R", 0.4), ("T1", "A", 0.3), ("T1", "B", 0.3)]);
        let r = layout.get(1, "R").cloned().expect("R");
        let a = layout.get(1, "A").cloned().expect("A");
        let b = layout.get(1, "B").cloned().expect("B");
        assert!(close(b.top, 0.95) && close(b.bottom, 0.65));
        assert!(close(a.top, 0.60) && close(a.bottom, 0.30));
        assert!(close(r.space.unwrap(), 0.1));
        assert!(r.space.is_some_and(|s| s <= r.effective_prevalence));
    }

    #[test]
    fn gap_shrinks_to_fit_parent_share() {
        let layout = run(0.5, &[("T1", "R", 0.3), ("T1", "A", 0.35), ("T1", "B", 0.35)]);
        let r = layout.get(1, "R").cloned().expect("R");
        let a = layout.get(1, "A").cloned().expect("A");
        assert!(close(r.space.unwrap(), 0.2));
        assert!(a.bottom >= r.bottom - 1e-9);
    }

    #[test]
    fn birth_markers_follow_moved_bands() {
        let layout = run(
            0.05,
            &[("T1", "R", 1.0), ("T2", "R", 0.4), ("T2", "A", 0.3), ("T2", "B", 0.3)],
        );
        for (g, mid) in [("A", 0.45), ("B", 0.8)] {
            let band = layout.get(2, g).expect("band at T2");
            let marker = layout.get(1, g).expect("marker at T1");
            assert_eq!(marker.state, IntervalState::Emerges);
            assert!(close(band.midpoint(), mid), "{g}: {band:?}");
            assert!(close(marker.bottom, mid) && close(marker.top, mid), "{g}: {marker:?}");
        }
    }

    #[test]
    fn lone_root_is_not_spaced() {
        let layout = run(0.05, &[("T1", "R", 1.0)]);
        let r = layout.get(1, "R").cloned().expect("R");
        assert!(r.space.is_none());
        assert!(close(r.bottom, 0.0) && close(r.top, 1.0));
    }
}
