use timesweep_protocol::{GenotypeId, IntervalState, LayoutInterval};

use super::{Layout, LayoutEngine};

/// Centre the root band, then nest each child inside its parent with equal
/// gaps carved from the parent's own share.
pub(super) fn layout(engine: &LayoutEngine<'_>) -> Layout {
    let mut layout = Layout::new(engine.prevalence.timepoints());
    let root = engine.tree.root();
    for tp in 0..engine.timepoint_count() {
        let width = engine.widths.get(tp, root).width;
        let bottom = ((1.0 - width) / 2.0).max(0.0);
        place(engine, &mut layout, tp, root, bottom);
    }
    layout
}

fn place(
    engine: &LayoutEngine<'_>,
    layout: &mut Layout,
    tp: usize,
    genotype: &GenotypeId,
    bottom: f64,
) {
    let w = engine.widths.get(tp, genotype);
    let observed = engine.observed(tp, genotype);
    let prev = tp.checked_sub(1);
    let lineage_now = engine.lineage_present(tp, genotype);
    let children = engine.ordered_children(genotype);
    let occupied = children
        .iter()
        .filter(|c| engine.lineage_present(tp, c))
        .count();

    if lineage_now {
        let state = if observed.is_some() {
            IntervalState::Present
        } else {
            IntervalState::Replaced
        };
        let mut interval =
            LayoutInterval::new(bottom, bottom + w.width, state, observed, w.effective_prevalence);
        interval.occupied_children = Some(occupied);
        layout.insert(tp, genotype, interval);

        if let Some(p) = prev
            && !engine.lineage_present(p, genotype)
        {
            let mid = bottom + w.width / 2.0;
            layout.insert(
                p,
                genotype,
                LayoutInterval::new(mid, mid, IntervalState::Emerges, None, 0.0),
            );
        }
    } else if let Some(p) = prev
        && engine.prevalence.is_observed(p, genotype)
    {
        layout.insert(
            tp,
            genotype,
            LayoutInterval::new(
                bottom,
                bottom,
                IntervalState::DisappearsStretched,
                None,
                w.effective_prevalence,
            ),
        );
    }

    let gap = w.effective_prevalence / (occupied + 1) as f64;
    let mut nested = 0.0;
    let mut gaps = 0usize;
    for child in children {
        if engine.lineage_present(tp, child) {
            gaps += 1;
        }
        place(engine, layout, tp, child, bottom + gaps as f64 * gap + nested);
        nested += engine.widths.get(tp, child).width;
    }
}
