use timesweep_protocol::{IntervalState, LayoutInterval};

use super::{Layout, LayoutEngine};

/// Stack bands bottom-to-top in the fixed layout order.
///
/// Each genotype's interval spans its whole width, but only its own
/// effective prevalence advances the stack, so descendants nest inside it.
pub(super) fn layout(engine: &LayoutEngine<'_>) -> Layout {
    let mut layout = Layout::new(engine.prevalence.timepoints());

    for tp in 0..engine.timepoint_count() {
        let prev = tp.checked_sub(1);
        let mut height = 0.0;

        for genotype in engine.order() {
            let w = engine.widths.get(tp, genotype);
            let observed = engine.observed(tp, genotype);
            let lineage_now = engine.lineage_present(tp, genotype);

            if let Some(p) = prev
                && engine.prevalence.is_observed(p, genotype)
                && !lineage_now
            {
                layout.insert(
                    tp,
                    genotype,
                    LayoutInterval::new(
                        height,
                        height,
                        IntervalState::DisappearsStretched,
                        None,
                        w.effective_prevalence,
                    ),
                );
                continue;
            }
            if !lineage_now {
                continue;
            }

            let (state, own) = match observed {
                Some(_) => (IntervalState::Present, w.effective_prevalence),
                None => (IntervalState::Replaced, 0.0),
            };
            let interval = LayoutInterval::new(
                height,
                height + w.width,
                state,
                observed,
                w.effective_prevalence,
            );
            let midpoint = interval.midpoint();
            layout.insert(tp, genotype, interval);
            height += own;

            if let Some(p) = prev
                && !engine.lineage_present(p, genotype)
            {
                layout.insert(
                    p,
                    genotype,
                    LayoutInterval::new(midpoint, midpoint, IntervalState::Emerges, None, 0.0),
                );
            }
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use timesweep_protocol::{GenotypePosition, IntervalState, TimesweepConfig};

    use crate::layout::fixtures::{close, prevalence, tree};
    use crate::layout::{LayoutEngine, WidthTable};

    fn config(threshold: f64) -> TimesweepConfig {
        TimesweepConfig {
            genotype_position: GenotypePosition::Stack,
            threshold,
            ..TimesweepConfig::default()
        }
    }

    #[test]
    fn replacement_scenario() {
        let t = tree(&[("root", "A"), ("A", "B"), ("A", "C")]);
        let p = prevalence(&[("T1", "A", 1.0), ("T2", "B", 0.4), ("T2", "C", 0.6)]);
        let cfg = config(0.05);
        let widths = WidthTable::compute(&t, &p, cfg.threshold);
        let layout = LayoutEngine::new(&t, &p, &widths, &cfg).run();

        let a1 = layout.get(1, "A").cloned().expect("A at T1");
        assert_eq!(a1.state, IntervalState::Present);
        assert!(close(a1.bottom, 0.0) && close(a1.top, 1.0));
        let present: Vec<&str> = layout
            .column(1)
            .filter(|(_, iv)| iv.state == IntervalState::Present)
            .map(|(g, _)| g.as_str())
            .collect();
        assert_eq!(present, vec!["A"]);
        assert_eq!(layout.get(1, "root").map(|iv| iv.state), Some(IntervalState::Replaced));

        let a2 = layout.get(2, "A").cloned().expect("A at T2");
        let b2 = layout.get(2, "B").cloned().expect("B at T2");
        let c2 = layout.get(2, "C").cloned().expect("C at T2");
        assert_eq!(a2.state, IntervalState::Replaced);
        assert_eq!(a2.effective_prevalence, 0.0);
        assert!(close(b2.height(), 0.4));
        assert!(close(c2.height(), 0.6));
        assert!(close(b2.bottom, 0.0) && close(c2.bottom, 0.4));
        assert!(a2.bottom <= b2.bottom && c2.top <= a2.top + 1e-9);

        // Births are pinned at T1, at the midpoints of their T2 bands.
        let b1 = layout.get(1, "B").cloned().expect("B marker");
        assert_eq!(b1.state, IntervalState::Emerges);
        assert!(close(b1.bottom, 0.2) && close(b1.top, 0.2));
    }

    #[test]
    fn own_thickness_is_conserved() {
        let t = tree(&[("R", "A"), ("R", "B"), ("A", "C")]);
        let p = prevalence(&[
            ("T1", "R", 0.6),
            ("T1", "A", 0.3),
            ("T1", "C", 0.1),
            ("T2", "R", 0.2),
            ("T2", "C", 0.5),
            ("T2", "B", 0.003),
        ]);
        let cfg = config(0.01);
        let widths = WidthTable::compute(&t, &p, cfg.threshold);
        let layout = LayoutEngine::new(&t, &p, &widths, &cfg).run();
        for tp in 1..layout.len() {
            let occupied: Vec<_> = layout
                .column(tp)
                .filter(|(_, iv)| iv.state.occupies())
                .map(|(_, iv)| iv)
                .collect();
            let total_eff: f64 = occupied.iter().map(|iv| iv.effective_prevalence).sum();
            let top = occupied.iter().map(|iv| iv.top).fold(0.0, f64::max);
            assert!(close(top, total_eff), "tp {tp}: {top} vs {total_eff}");
        }
    }

    #[test]
    fn disappearance_pinches_to_a_point() {
        let t = tree(&[("R", "A"), ("R", "B")]);
        let p = prevalence(&[
            ("T1", "R", 0.5),
            ("T1", "A", 0.5),
            ("T2", "R", 0.5),
            ("T2", "B", 0.5),
        ]);
        let cfg = config(0.01);
        let widths = WidthTable::compute(&t, &p, cfg.threshold);
        let layout = LayoutEngine::new(&t, &p, &widths, &cfg).run();
        let a2 = layout.get(2, "A").cloned().expect("A at T2");
        assert_eq!(a2.state, IntervalState::DisappearsStretched);
        assert_eq!(a2.height(), 0.0);
        assert!(layout.get(3, "A").is_none());
    }
}
