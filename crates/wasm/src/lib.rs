use timesweep_core::svg::render_svg;
use timesweep_core::views::{drawing_size, render_timesweep};
use timesweep_core::{LayoutInput, LayoutResult};
use timesweep_protocol::SweepView;
use wasm_bindgen::prelude::*;

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn run(document: &str) -> Result<(LayoutInput, LayoutResult), JsError> {
    let doc = timesweep_core::parse_input(document.as_bytes()).map_err(js_err)?;
    timesweep_core::compute(&doc).map_err(js_err)
}

fn parse_view(view: &str) -> Result<SweepView, JsError> {
    view.parse::<SweepView>().map_err(|e| JsError::new(&e))
}

/// Compute the full layout for a JSON input document, returned as JSON.
#[wasm_bindgen]
pub fn compute_timesweep(document: &str) -> Result<String, JsError> {
    let (_, result) = run(document)?;
    serde_json::to_string(&result).map_err(js_err)
}

/// Render commands for one view (`traditional` or `tracks`), as JSON.
#[wasm_bindgen]
pub fn render_commands(document: &str, view: &str) -> Result<String, JsError> {
    let view = parse_view(view)?;
    let (input, result) = run(document)?;
    let commands = render_timesweep(&input, &result, view);
    serde_json::to_string(&commands).map_err(js_err)
}

/// Standalone SVG for one view.
#[wasm_bindgen]
pub fn render_timesweep_svg(document: &str, view: &str, dark: bool) -> Result<String, JsError> {
    let view = parse_view(view)?;
    let (input, result) = run(document)?;
    let commands = render_timesweep(&input, &result, view);
    let (width, height) = drawing_size(&input.config);
    Ok(render_svg(&commands, width, height, dark))
}
