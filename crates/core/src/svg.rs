//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use timesweep_protocol::{Paint, RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the palette for themed colours; genotype colours are used
/// as given.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 200);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:11px">"#,
    ));

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
            } => {
                let fill = resolve_paint(*color, dark);
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}""#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                if let Some(border) = border_color {
                    svg.push_str(&format!(r#" stroke="{}""#, resolve_paint(*border, dark)));
                }
                svg.push('>');
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
                svg.push_str("</rect>");
            }
            RenderCommand::DrawPath {
                d,
                fill,
                stroke,
                stroke_width,
                genotype,
            } => {
                let fill = fill.map_or_else(|| "none".to_string(), |p| resolve_paint(p, dark));
                svg.push_str(&format!(r#"<path d="{d}" fill="{fill}""#));
                if let Some(stroke) = stroke {
                    svg.push_str(&format!(
                        r#" stroke="{}" stroke-width="{stroke_width}""#,
                        resolve_paint(*stroke, dark),
                    ));
                }
                match genotype {
                    Some(g) => svg.push_str(&format!(
                        r#" data-genotype="{0}"><title>{0}</title></path>"#,
                        escape_xml(g),
                    )),
                    None => svg.push_str("/>"),
                }
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_paint(*color, dark);
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
            RenderCommand::DrawCircle {
                center,
                radius,
                fill,
                stroke,
                genotype,
            } => {
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="{}""#,
                    center.x,
                    center.y,
                    resolve_paint(*fill, dark),
                ));
                if let Some(stroke) = stroke {
                    svg.push_str(&format!(r#" stroke="{}""#, resolve_paint(*stroke, dark)));
                }
                if let Some(g) = genotype {
                    svg.push_str(&format!(r#" data-genotype="{}""#, escape_xml(g)));
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_paint(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::BeginGroup { id, label } => {
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_paint(paint: Paint, dark: bool) -> String {
    match paint {
        Paint::Solid(color) => color.to_hex(),
        Paint::Theme(token) => resolve_color(token, dark).to_string(),
    }
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#181818",
            ThemeToken::Border => "#303030",
            ThemeToken::TextPrimary => "#ececec",
            ThemeToken::TextMuted | ThemeToken::AxisText => "#9e9e9e",
            ThemeToken::AxisLine | ThemeToken::LegendLink => "#616161",
        }
    } else {
        match token {
            ThemeToken::Background => "#ffffff",
            ThemeToken::Border => "#dee2e6",
            ThemeToken::TextPrimary => "#1a1a2e",
            ThemeToken::TextMuted | ThemeToken::AxisText => "#666677",
            ThemeToken::AxisLine | ThemeToken::LegendLink => "#999999",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use timesweep_protocol::{Color, GenotypeId, Point, Rect};

    #[test]
    fn basic_svg_output() {
        let commands = vec![
            RenderCommand::DrawRect {
                rect: Rect::new(0.0, 0.0, 800.0, 400.0),
                color: ThemeToken::Background.into(),
                border_color: None,
                label: None,
            },
            RenderCommand::DrawPath {
                d: "M0,0 L10,10".into(),
                fill: Some(Color::rgb(255, 0, 0).into()),
                stroke: None,
                stroke_width: 1.0,
                genotype: Some(GenotypeId::from("A")),
            },
        ];
        let svg = render_svg(&commands, 800.0, 400.0, true);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("#181818"));
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains(r#"data-genotype="A""#));
    }

    #[test]
    fn unfilled_paths_and_groups() {
        let commands = vec![
            RenderCommand::BeginGroup {
                id: "legend".into(),
                label: None,
            },
            RenderCommand::DrawPath {
                d: "M0,0".into(),
                fill: None,
                stroke: Some(ThemeToken::LegendLink.into()),
                stroke_width: 2.0,
                genotype: None,
            },
            RenderCommand::EndGroup,
        ];
        let svg = render_svg(&commands, 10.0, 10.0, false);
        assert!(svg.contains(
            r##"<g id="legend"><path d="M0,0" fill="none" stroke="#999999" stroke-width="2"/></g>"##
        ));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(0.0, 0.0),
            text: "B<1> & \"C\"".into(),
            color: ThemeToken::TextPrimary.into(),
            font_size: 10.0,
            align: TextAlign::Left,
        }];
        let svg = render_svg(&commands, 400.0, 100.0, false);
        assert!(svg.contains("B&lt;1&gt; &amp; &quot;C&quot;"));
        assert!(svg.contains(r#"text-anchor="start""#));
    }
}
