use timesweep_protocol::{
    Point, Rect, RenderCommand, SweepView, TextAlign, ThemeToken, TimesweepConfig,
};

use crate::palette::Palette;
use crate::pipeline::{LayoutInput, LayoutResult};
use crate::views::legend::render_legend;

const AXIS_HEIGHT: f64 = 28.0;
const AXIS_LABEL_Y: f64 = 18.0;
const LEGEND_GAP: f64 = 24.0;
const LEGEND_WIDTH: f64 = 160.0;
const FONT_SIZE: f64 = 11.0;
const LABEL_FONT_SIZE: f64 = 9.0;
const STROKE_WIDTH: f64 = 1.5;

/// Pixel size of the full drawing: sweep, timepoint axis and legend.
pub fn drawing_size(config: &TimesweepConfig) -> (f64, f64) {
    (
        config.canvas.width + LEGEND_GAP + LEGEND_WIDTH,
        config.canvas.height + AXIS_HEIGHT,
    )
}

/// Turn a computed layout into render commands for one view.
pub fn render_timesweep(
    input: &LayoutInput,
    result: &LayoutResult,
    view: SweepView,
) -> Vec<RenderCommand> {
    let config = &input.config;
    let canvas = config.canvas;
    let palette = Palette::derive(&input.tree, &input.clone_cols, config.alpha);
    let (total_width, total_height) = drawing_size(config);
    let mut commands = Vec::with_capacity(result.layout_order.len() * 2 + 16);

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, total_width, total_height),
        color: ThemeToken::Background.into(),
        border_color: None,
        label: None,
    });

    commands.push(RenderCommand::BeginGroup {
        id: "sweep".into(),
        label: Some(match view {
            SweepView::Traditional => "Timesweep".into(),
            SweepView::Tracks => "Timesweep tracks".into(),
        }),
    });
    // Curves are emitted in layout order so descendants paint over ancestors.
    for curve in result.curves(view) {
        if curve.d.is_empty() {
            continue;
        }
        commands.push(RenderCommand::DrawPath {
            d: curve.d.clone(),
            fill: Some(palette.fill(&curve.genotype).into()),
            stroke: Some(palette.stroke(&curve.genotype).into()),
            stroke_width: STROKE_WIDTH,
            genotype: Some(curve.genotype.clone()),
        });
    }

    if config.show_labels {
        for label in result.labels(view) {
            let Some(x) = timepoint_x(result, &label.timepoint, canvas.width) else {
                continue;
            };
            commands.push(RenderCommand::DrawText {
                position: Point::new(x, label.middle * canvas.height),
                text: format!("{:.0}%", label.prevalence * 100.0),
                color: ThemeToken::TextPrimary.into(),
                font_size: LABEL_FONT_SIZE,
                align: TextAlign::Center,
            });
        }
    }
    commands.push(RenderCommand::EndGroup);

    commands.extend(render_axis(result, canvas.width, canvas.height));
    commands.extend(render_legend(
        &input.tree,
        &palette,
        Rect::new(
            canvas.width + LEGEND_GAP,
            0.0,
            LEGEND_WIDTH,
            canvas.height,
        ),
    ));
    commands
}

fn timepoint_x(result: &LayoutResult, timepoint: &str, width: f64) -> Option<f64> {
    let idx = result.timepoints.iter().position(|tp| tp == timepoint)?;
    let steps = result.timepoints.len().checked_sub(1).filter(|&n| n > 0)?;
    Some(idx as f64 / steps as f64 * width)
}

/// Baseline plus one label per observed timepoint (the origin is unlabelled).
fn render_axis(result: &LayoutResult, width: f64, top: f64) -> Vec<RenderCommand> {
    let mut commands = vec![
        RenderCommand::BeginGroup {
            id: "axis".into(),
            label: Some("Timepoints".into()),
        },
        RenderCommand::DrawLine {
            from: Point::new(0.0, top),
            to: Point::new(width, top),
            color: ThemeToken::AxisLine.into(),
            width: 1.0,
        },
    ];
    let last = result.timepoints.len().saturating_sub(1);
    for (idx, tp) in result.timepoints.iter().enumerate().skip(1) {
        let Some(x) = timepoint_x(result, tp, width) else {
            continue;
        };
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, top + AXIS_LABEL_Y),
            text: tp.clone(),
            color: ThemeToken::AxisText.into(),
            font_size: FONT_SIZE,
            align: if idx == last {
                TextAlign::Right
            } else {
                TextAlign::Center
            },
        });
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use timesweep_protocol::{PrevalenceRecord, TimesweepInput, TreeEdge};

    use crate::pipeline::compute;

    fn document(show_labels: bool) -> TimesweepInput {
        let mut doc = TimesweepInput {
            tree_edges: vec![TreeEdge::new("A", "B"), TreeEdge::new("A", "C")],
            clonal_prev: vec![
                PrevalenceRecord::new("Dx", "A", 0.8),
                PrevalenceRecord::new("Dx", "B", 0.2),
                PrevalenceRecord::new("Rx", "A", 0.3),
                PrevalenceRecord::new("Rx", "B", 0.3),
                PrevalenceRecord::new("Rx", "C", 0.4),
            ],
            ..TimesweepInput::default()
        };
        doc.config.show_labels = show_labels;
        doc
    }

    #[test]
    fn one_band_per_genotype() {
        let (input, result) = compute(&document(false)).unwrap();
        let commands = render_timesweep(&input, &result, SweepView::Traditional);
        let bands: Vec<String> = commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawPath {
                    genotype: Some(g),
                    fill: Some(_),
                    ..
                } => Some(g.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(bands, vec!["A", "B", "C"]);
        let axis_labels = commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawText { text, .. } if text == "Dx" || text == "Rx"))
            .count();
        assert_eq!(axis_labels, 2);
    }

    #[test]
    fn labels_only_when_enabled() {
        let percent = |commands: &[RenderCommand]| {
            commands
                .iter()
                .filter(|c| matches!(c, RenderCommand::DrawText { text, .. } if text.ends_with('%')))
                .count()
        };
        let (input, result) = compute(&document(false)).unwrap();
        assert_eq!(percent(&render_timesweep(&input, &result, SweepView::Tracks)), 0);
        let (input, result) = compute(&document(true)).unwrap();
        assert_eq!(percent(&render_timesweep(&input, &result, SweepView::Tracks)), 5);
        assert_eq!(percent(&render_timesweep(&input, &result, SweepView::Traditional)), 5);
    }
}
