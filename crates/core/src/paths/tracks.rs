use timesweep_protocol::{GenotypeId, GenotypePath, IntervalState, PathPoint};

use crate::layout::Layout;
use crate::model::PrevalenceTable;

/// One independent lane per observed genotype.
///
/// Lane heights are proportional to each genotype's largest prevalence and
/// lanes are separated by `padding`. Within a lane the band is centred on the
/// lane midpoint with a thickness equal to the (rescaled) prevalence; entry
/// and exit states collapse onto the midpoint.
pub fn tracks_paths(
    layout: &Layout,
    order: &[GenotypeId],
    prevalence: &PrevalenceTable,
    padding: f64,
) -> Vec<GenotypePath> {
    let count = layout.len();
    let lanes: Vec<(&GenotypeId, f64)> = order
        .iter()
        .filter_map(|g| prevalence.max_prevalence(g).map(|m| (g, m)))
        .collect();
    if count < 2 || lanes.is_empty() {
        return Vec::new();
    }

    let x_denom = (count - 1) as f64;
    let denominator =
        lanes.iter().map(|&(_, m)| m).sum::<f64>() + padding * (lanes.len() + 1) as f64;
    let tps = layout.timepoints();
    let mut stacked = 0.0;

    lanes
        .into_iter()
        .enumerate()
        .map(|(lane, (genotype, largest))| {
            let midpoint =
                largest / denominator / 2.0 + stacked + (lane + 1) as f64 * padding / denominator;
            stacked += largest / denominator;

            let sample = |idx: usize, upper: bool| -> Option<PathPoint> {
                let iv = layout.get(idx, genotype)?;
                let observed = prevalence.get(idx, genotype);
                let transition = matches!(
                    iv.state,
                    IntervalState::Emerges
                        | IntervalState::Replaced
                        | IntervalState::DisappearsStretched
                );
                if !transition && observed.is_none() {
                    return None;
                }
                let x = (idx as f64 + iv.x_shift.unwrap_or(0.0)) / x_denom;
                let half = observed.map_or(0.0, |p| p / denominator / 2.0);
                let y = if upper { midpoint + half } else { midpoint - half };
                let mut point = PathPoint::at(x, y, &tps[idx]);
                point.prevalence = observed;
                Some(point)
            };

            let mut points: Vec<PathPoint> = (0..count).filter_map(|i| sample(i, false)).collect();
            points.extend((0..count).rev().filter_map(|i| sample(i, true)));

            GenotypePath {
                genotype: genotype.clone(),
                midpoint: Some(midpoint),
                points,
            }
        })
        .collect()
}
