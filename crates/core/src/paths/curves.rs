use kurbo::{BezPath, Point};
use serde::Serialize;
use timesweep_protocol::{Canvas, GenotypeId, GenotypePath};

/// A band outline in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePath {
    pub genotype: GenotypeId,
    #[serde(skip)]
    pub path: BezPath,
    /// SVG path data for `path`.
    pub d: String,
}

/// Scale normalized paths to the canvas and smooth them.
///
/// Each consecutive pair of points becomes a cubic with horizontal tangents
/// at both ends; successive segments are joined with a line so bands keep
/// crisp corners where two samples share an x.
pub fn to_curves(paths: &[GenotypePath], canvas: Canvas) -> Vec<CurvePath> {
    paths
        .iter()
        .map(|path| {
            let scaled: Vec<Point> = path
                .points
                .iter()
                .map(|p| Point::new(p.x * canvas.width, p.y * canvas.height))
                .collect();
            let mut bez = BezPath::new();
            for (i, pair) in scaled.windows(2).enumerate() {
                diagonal(&mut bez, pair[0], pair[1], i == 0);
            }
            CurvePath {
                genotype: path.genotype.clone(),
                d: bez.to_svg(),
                path: bez,
            }
        })
        .collect()
}

/// Append one horizontal-tangent cubic from `from` to `to`.
pub fn diagonal(path: &mut BezPath, from: Point, to: Point, first: bool) {
    if first {
        path.move_to(from);
    } else {
        path.line_to(from);
    }
    let mid_x = (from.x + to.x) / 2.0;
    path.curve_to(Point::new(mid_x, from.y), Point::new(mid_x, to.y), to);
}

/// Right-angled connector from `source` to `target` turning halfway across.
pub fn elbow(source: Point, target: Point) -> BezPath {
    let mid_x = (source.x + target.x) / 2.0;
    let mut path = BezPath::new();
    path.move_to(source);
    path.line_to((mid_x, source.y));
    path.line_to((mid_x, target.y));
    path.line_to(target);
    path
}
