use std::collections::HashSet;

use timesweep_protocol::{
    GenotypePath, GenotypePosition, IntervalState, LayoutInterval, PointTag, PrevalenceLabel,
    SweepView,
};

use crate::layout::Layout;
use crate::model::ORIGIN_TIMEPOINT;

/// One label per `present` interval, anchored in the genotype's own share of
/// its band.
pub fn traditional_labels(layout: &Layout, position: GenotypePosition) -> Vec<PrevalenceLabel> {
    let mut labels = Vec::new();
    for (idx, tp) in layout.timepoints().iter().enumerate().skip(1) {
        for (genotype, iv) in layout.column(idx) {
            if iv.state != IntervalState::Present {
                continue;
            }
            let Some(prevalence) = iv.prevalence else {
                continue;
            };
            labels.push(PrevalenceLabel {
                timepoint: tp.clone(),
                genotype: genotype.clone(),
                prevalence,
                middle: label_middle(iv, position),
                view: SweepView::Traditional,
            });
        }
    }
    labels
}

fn label_middle(iv: &LayoutInterval, position: GenotypePosition) -> f64 {
    let own = iv.effective_prevalence;
    match position {
        GenotypePosition::Centre => {
            let slots = iv.occupied_children.unwrap_or(0) + 1;
            iv.top - own / (2 * slots) as f64
        }
        GenotypePosition::Stack => iv.bottom + own / 2.0,
        GenotypePosition::Space => iv.bottom + (own - iv.space.unwrap_or(0.0)) / 2.0,
    }
}

/// One label per observed lane sample, on the lane midpoint.
pub fn tracks_labels(paths: &[GenotypePath]) -> Vec<PrevalenceLabel> {
    let mut labels = Vec::new();
    for path in paths {
        let Some(middle) = path.midpoint else {
            continue;
        };
        // Both edges of a lane carry the same observation.
        let mut seen = HashSet::new();
        for point in &path.points {
            let (PointTag::Timepoint(tp), Some(prevalence)) = (&point.tag, point.prevalence) else {
                continue;
            };
            if tp == ORIGIN_TIMEPOINT || !seen.insert(tp) {
                continue;
            }
            labels.push(PrevalenceLabel {
                timepoint: tp.clone(),
                genotype: path.genotype.clone(),
                prevalence,
                middle,
                view: SweepView::Tracks,
            });
        }
    }
    labels
}
