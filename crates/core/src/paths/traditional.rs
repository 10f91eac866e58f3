use timesweep_protocol::{GenotypeId, GenotypePath, IntervalState, LayoutInterval, PathPoint};

use super::Perturbations;
use crate::layout::Layout;

/// Horizontal placement of one interval's samples, with the partition count
/// and shift adjusted for a following perturbation.
struct Slot {
    x: f64,
    /// Point one partition to the right of the emergence, if partitioned.
    partition_x: Option<f64>,
    /// Event midpoint position and surviving fraction.
    event: Option<(f64, f64)>,
}

impl Slot {
    fn new(idx: usize, interval: &LayoutInterval, events: &Perturbations, denom: f64) -> Self {
        let event = events.after(idx);
        let mut shift = interval.x_shift.unwrap_or(0.0);
        let mut partitions = interval.n_partitions.map(f64::from);
        if event.is_some() {
            // The event midpoint takes the first half of the step.
            partitions = partitions.map(|p| p * 2.0);
            shift = 0.5 + shift / 2.0;
        }
        let base = idx as f64;
        let x = if interval.state == IntervalState::Emerges {
            (base + shift) / denom
        } else {
            base / denom
        };
        Self {
            x,
            partition_x: partitions.map(|p| (base + shift + 1.0 / p) / denom),
            event: event.map(|frac| (base / denom + 1.0 / (2.0 * denom), frac)),
        }
    }
}

/// Boundary of every band in the nested sweep: the bottom edge forward in
/// time, then the top edge backward.
pub fn traditional_paths(
    layout: &Layout,
    order: &[GenotypeId],
    events: &Perturbations,
) -> Vec<GenotypePath> {
    let count = layout.len();
    if count < 2 {
        return Vec::new();
    }
    let denom = (count - 1) as f64;
    let tps = layout.timepoints();

    order
        .iter()
        .map(|genotype| {
            let mut points = Vec::new();

            for (idx, tp) in tps.iter().enumerate() {
                let Some(iv) = layout.get(idx, genotype) else {
                    continue;
                };
                let slot = Slot::new(idx, iv, events, denom);
                let next = layout.get(idx + 1, genotype);

                points.push(PathPoint::at(slot.x, iv.bottom, tp));
                if iv.state != IntervalState::Emerges
                    && let (Some((x, frac)), Some(next)) = (slot.event, next)
                {
                    let y = (iv.bottom + next.bottom) / 2.0;
                    points.push(PathPoint::event(x, converge(y, frac)));
                }
                if let (Some(x), Some(next)) = (slot.partition_x, next) {
                    points.push(PathPoint::at(x, next.bottom, tp));
                }
            }

            for (idx, tp) in tps.iter().enumerate().rev() {
                let Some(iv) = layout.get(idx, genotype) else {
                    continue;
                };
                let slot = Slot::new(idx, iv, events, denom);
                let next = layout.get(idx + 1, genotype);

                if let (Some(x), Some(next)) = (slot.partition_x, next) {
                    points.push(PathPoint::at(x, next.top, tp));
                }
                if iv.state != IntervalState::Emerges
                    && let (Some((x, frac)), Some(next)) = (slot.event, next)
                {
                    let y = (iv.top + next.top) / 2.0;
                    points.push(PathPoint::event(x, converge(y, frac)));
                }
                points.push(PathPoint::at(slot.x, iv.top, tp));
            }

            GenotypePath {
                genotype: genotype.clone(),
                midpoint: None,
                points,
            }
        })
        .collect()
}

/// Pull `y` towards the vertical centre as the surviving fraction drops.
fn converge(y: f64, frac: f64) -> f64 {
    y * frac + (1.0 - frac) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use timesweep_protocol::{PerturbationEvent, PointTag, TimesweepConfig};

    use crate::layout::fixtures::{close, prevalence, tree};
    use crate::layout::{LayoutEngine, WidthTable};

    fn build(events: &[PerturbationEvent]) -> Vec<GenotypePath> {
        let t = tree(&[("R", "A")]);
        let p = prevalence(&[
            ("T1", "R", 1.0),
            ("T2", "R", 0.6),
            ("T2", "A", 0.4),
        ]);
        let cfg = TimesweepConfig {
            threshold: 0.01,
            ..TimesweepConfig::default()
        };
        let widths = WidthTable::compute(&t, &p, cfg.threshold);
        let engine = LayoutEngine::new(&t, &p, &widths, &cfg);
        let layout = engine.run();
        let (events, _) = Perturbations::resolve(events, layout.timepoints());
        traditional_paths(&layout, engine.order(), &events)
    }

    #[test]
    fn closed_boundary_within_unit_square() {
        let paths = build(&[]);
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert!(!path.points.is_empty());
            for pt in &path.points {
                assert!((0.0..=1.0).contains(&pt.x), "{pt:?}");
                assert!((-1e-9..=1.0 + 1e-9).contains(&pt.y), "{pt:?}");
            }
        }
        let root = &paths[0];
        assert_eq!(root.genotype, "R");
        // Forward bottom edge starts at the birth point, reverse top edge ends there.
        let first = &root.points[0];
        let last = &root.points[root.points.len() - 1];
        assert_eq!(first.tag, PointTag::Timepoint("T0".into()));
        assert!(close(first.x, last.x) && close(first.y, last.y));
    }

    #[test]
    fn emergence_tapers_between_timepoints() {
        let paths = build(&[]);
        let a = &paths[1];
        // A is born at T1 (index 1 of 3, denominator 2) in the middle slot.
        let birth = &a.points[0];
        assert!(close(birth.x, (1.0 + 0.5) / 2.0));
        let taper = &a.points[1];
        assert!(close(taper.x, (1.0 + 0.5 + 0.5) / 2.0));
        assert!(close(taper.y, 0.6));
    }

    #[test]
    fn outline_runs_bottom_edge_first() {
        let paths = build(&[]);
        let root = &paths[0];
        let half = root.points.len() / 2;
        let (forward, backward) = root.points.split_at(half);
        // R spans the whole square at T1 and T2: bottoms at 0, tops at 1.
        assert!(forward.iter().skip(1).all(|p| close(p.y, 0.0)), "{forward:?}");
        assert!(backward.iter().rev().skip(1).all(|p| close(p.y, 1.0)), "{backward:?}");
        assert!(forward.windows(2).all(|w| w[0].x <= w[1].x));
        assert!(backward.windows(2).all(|w| w[0].x >= w[1].x));
    }

    #[test]
    fn emergence_under_perturbation_moves_into_second_half() {
        let events = [PerturbationEvent {
            prev_tp: "T1".into(),
            frac: 0.2,
        }];
        let paths = build(&events);
        let a = &paths[1];
        // Shift 0.5 becomes 0.5 + 0.5 / 2 with the event taking the first half.
        assert!(close(a.points[0].x, (1.0 + 0.75) / 2.0), "{:?}", a.points[0]);
        let taper = &a.points[1];
        assert!(close(taper.x, (1.0 + 0.75 + 0.25) / 2.0));
        assert!(a.points.iter().all(|p| p.tag != PointTag::Event));
    }

    #[test]
    fn perturbation_inserts_converging_midpoints() {
        let events = [PerturbationEvent {
            prev_tp: "T1".into(),
            frac: 0.2,
        }];
        let paths = build(&events);
        let root = &paths[0];
        let midpoints: Vec<&PathPoint> = root
            .points
            .iter()
            .filter(|p| p.tag == PointTag::Event)
            .collect();
        assert_eq!(midpoints.len(), 2);
        for pt in midpoints {
            assert!(close(pt.x, 0.5 + 0.25));
            assert!(pt.y > 0.35 && pt.y < 0.65, "{pt:?}");
        }
    }
}
