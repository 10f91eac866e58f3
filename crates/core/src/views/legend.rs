use std::collections::HashMap;

use kurbo::Point as KPoint;
use timesweep_protocol::{GenotypeId, Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::model::GenotypeTree;
use crate::palette::Palette;
use crate::paths::elbow;

const NODE_RADIUS: f64 = 5.0;
const FONT_SIZE: f64 = 10.0;
const LINK_WIDTH: f64 = 1.5;

/// Draw the ancestry tree inside `bounds`, root on the left.
///
/// Depth maps to x (the phantom root sits on the left edge and only
/// contributes the lead-in link); leaves are spread evenly in pre-order and
/// each parent is centred on its children.
pub fn render_legend(tree: &GenotypeTree, palette: &Palette, bounds: Rect) -> Vec<RenderCommand> {
    let positions = node_positions(tree, bounds);
    let mut commands = Vec::with_capacity(tree.genotypes().len() * 3 + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "legend".into(),
        label: Some("Genotype tree".into()),
    });

    for genotype in tree.genotypes() {
        let (Some(parent), Some(&target)) = (tree.parent_of(genotype), positions.get(genotype))
        else {
            continue;
        };
        let Some(&source) = positions.get(parent) else {
            continue;
        };
        let link = elbow(KPoint::new(source.x, source.y), KPoint::new(target.x, target.y));
        commands.push(RenderCommand::DrawPath {
            d: link.to_svg(),
            fill: None,
            stroke: Some(ThemeToken::LegendLink.into()),
            stroke_width: LINK_WIDTH,
            genotype: None,
        });
    }

    for genotype in tree.genotypes() {
        let Some(&center) = positions.get(genotype) else {
            continue;
        };
        commands.push(RenderCommand::DrawCircle {
            center,
            radius: NODE_RADIUS,
            fill: palette.fill(genotype).into(),
            stroke: Some(palette.stroke(genotype).into()),
            genotype: Some(genotype.clone()),
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(center.x, center.y - NODE_RADIUS - 2.0),
            text: genotype.to_string(),
            color: ThemeToken::TextMuted.into(),
            font_size: FONT_SIZE,
            align: TextAlign::Center,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

fn node_positions(tree: &GenotypeTree, bounds: Rect) -> HashMap<GenotypeId, Point> {
    let indices = tree.indices();
    let leaves: Vec<&GenotypeId> = tree
        .genotypes()
        .iter()
        .filter(|g| tree.children_of(g).is_empty())
        .collect();
    let depth_step = bounds.w / indices.height.max(1) as f64;
    let leaf_step = bounds.h / leaves.len().max(1) as f64;

    let mut ys: HashMap<GenotypeId, f64> = leaves
        .iter()
        .enumerate()
        .map(|(i, g)| ((*g).clone(), bounds.y + (i as f64 + 0.5) * leaf_step))
        .collect();
    // Reverse pre-order visits children before their parent.
    let phantom = tree.phantom_root().clone();
    for genotype in tree.genotypes().iter().rev().chain(std::iter::once(&phantom)) {
        let children = tree.children_of(genotype);
        if children.is_empty() {
            continue;
        }
        let sum: f64 = children.iter().filter_map(|c| ys.get(c)).sum();
        ys.insert(genotype.clone(), sum / children.len() as f64);
    }

    ys.into_iter()
        .map(|(g, y)| {
            let depth = tree.ancestors_of(&g).len() as f64;
            (g, Point::new(bounds.x + depth * depth_step, y))
        })
        .collect()
}
