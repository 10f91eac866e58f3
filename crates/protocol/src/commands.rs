use serde::{Deserialize, Serialize};

use crate::genotype_id::GenotypeId;
use crate::theme::Paint;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core turns a finished layout into a `Vec<RenderCommand>`. Renderers
/// consume this list sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a tooltip label.
    DrawRect {
        rect: Rect,
        color: Paint,
        border_color: Option<Paint>,
        label: Option<String>,
    },

    /// Fill and/or stroke an SVG path in pixel space. `genotype` identifies
    /// the band for hit-testing.
    DrawPath {
        d: String,
        fill: Option<Paint>,
        stroke: Option<Paint>,
        stroke_width: f64,
        genotype: Option<GenotypeId>,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: Paint,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: Paint,
        width: f64,
    },

    /// Draw a filled circle (legend tree nodes).
    DrawCircle {
        center: Point,
        radius: f64,
        fill: Paint,
        stroke: Option<Paint>,
        genotype: Option<GenotypeId>,
    },

    /// Begin a logical group (e.g. the sweep, the legend).
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
