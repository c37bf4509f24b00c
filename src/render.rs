use crate::config::{LayoutConfig, RenderConfig};
use crate::dataset::Gender;
use crate::layout::{EdgeLayout, Layout, NodeLayout, NodeRole};
use crate::text_metrics::text_width;
use crate::theme::Theme;
use crate::viewport::Viewport;
use anyhow::Result;
use std::path::Path;

const LABEL_PADDING_X: f32 = 4.0;
const LABEL_HEIGHT: f32 = 16.0;
const NAME_GAP: f32 = 20.0;
const INFO_GAP: f32 = 36.0;
const LEGEND_ROW: f32 = 18.0;

/// Interactive state folded into a static render.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    /// Path id whose connectors are emphasized and labelled.
    pub highlighted_path: Option<String>,
    /// Person id drawn enlarged with its info line.
    pub hovered_node: Option<String>,
    pub viewport: Option<Viewport>,
}

impl RenderState {
    pub fn highlighting(path_id: impl Into<String>) -> Self {
        Self {
            highlighted_path: Some(path_id.into()),
            ..Self::default()
        }
    }
}

pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig, state: &RenderState) -> String {
    let mut svg = String::new();
    let width = layout.width.max(200.0);
    let height = layout.height.max(200.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    match &state.viewport {
        Some(viewport) => svg.push_str(&format!("<g transform=\"{}\">", viewport.svg_transform())),
        None => svg.push_str("<g>"),
    }

    let highlighted = state.highlighted_path.as_deref();
    for edge in &layout.edges {
        let stroke_width = if highlighted == Some(edge.path_id.as_str()) { 3 } else { 2 };
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{stroke_width}\" data-path=\"{}\"/>",
            points_to_path(&edge.points),
            escape_xml(&edge.color),
            escape_xml(&edge.path_id)
        ));
    }
    if highlighted.is_some() {
        for edge in layout
            .edges
            .iter()
            .filter(|edge| highlighted == Some(edge.path_id.as_str()))
        {
            svg.push_str(&edge_label_svg(edge, theme));
        }
    }

    for node in layout.ordered_nodes() {
        let hovered = state.hovered_node.as_deref() == Some(node.id.as_str());
        svg.push_str(&node_svg(node, hovered, theme, config));
    }
    svg.push_str("</g>");

    svg.push_str(&legend_svg(layout, theme));
    svg.push_str("</svg>");
    svg
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

/// Text centered on `(x, y)` over a background box sized to the text.
fn label_svg(x: f32, y: f32, text: &str, font_size: f32, fill: &str, background: &str, theme: &Theme) -> String {
    let box_width = text_width(text, font_size, &theme.font_family) + LABEL_PADDING_X * 2.0;
    format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{box_width:.2}\" height=\"{LABEL_HEIGHT:.2}\" fill=\"{}\"/>\
<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{}\">{}</text>",
        x - box_width / 2.0,
        y - LABEL_HEIGHT / 2.0,
        escape_xml(background),
        escape_xml(&theme.font_family),
        escape_xml(fill),
        escape_xml(text)
    )
}

fn edge_label_svg(edge: &EdgeLayout, theme: &Theme) -> String {
    let (x, y) = edge.label_anchor;
    label_svg(
        x,
        y,
        &edge.relationship,
        theme.font_size,
        &edge.color,
        &theme.edge_label_background,
        theme,
    )
}

fn node_svg(node: &NodeLayout, hovered: bool, theme: &Theme, config: &LayoutConfig) -> String {
    let size = if hovered { config.hover_radius } else { config.node_radius };
    let fill = match node.role {
        NodeRole::Source => &theme.source_fill,
        NodeRole::Target => &theme.target_fill,
        NodeRole::Intermediate => &theme.intermediate_fill,
    };
    let stroke_width = if hovered { 3 } else { 2 };
    let mut out = String::new();

    let shape = |dx: f32, dy: f32, paint: &str| match node.gender {
        Gender::Male => format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" {paint}/>",
            node.x - size + dx,
            node.y - size + dy,
            size * 2.0,
            size * 2.0
        ),
        Gender::Female => format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{size:.2}\" {paint}/>",
            node.x + dx,
            node.y + dy
        ),
    };
    out.push_str(&shape(2.0, 2.0, &format!("fill=\"{}\"", escape_xml(&theme.node_shadow))));
    out.push_str(&shape(
        0.0,
        0.0,
        &format!(
            "fill=\"{}\" stroke=\"{}\" stroke-width=\"{stroke_width}\" data-id=\"{}\"",
            escape_xml(fill),
            escape_xml(&theme.node_stroke),
            escape_xml(&node.id)
        ),
    ));

    let name_size = if hovered { theme.hover_font_size } else { theme.font_size };
    out.push_str(&label_svg(
        node.x,
        node.y + size + NAME_GAP,
        &node.name,
        name_size,
        &theme.text_color,
        &theme.label_background,
        theme,
    ));
    if hovered && !node.info.is_empty() {
        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            node.x,
            node.y + size + INFO_GAP,
            escape_xml(&theme.font_family),
            theme.info_font_size,
            escape_xml(&theme.info_text_color),
            escape_xml(&node.info)
        ));
    }
    out
}

/// "Yo'l N" swatches in screen space, one per routed path.
fn legend_svg(layout: &Layout, theme: &Theme) -> String {
    let mut entries: Vec<(usize, &str)> = Vec::new();
    for edge in &layout.edges {
        if !entries.iter().any(|(idx, _)| *idx == edge.path_index) {
            entries.push((edge.path_index, edge.color.as_str()));
        }
    }
    if entries.is_empty() {
        return String::new();
    }
    entries.sort_by_key(|(idx, _)| *idx);

    let mut out = String::from("<g class=\"legend\">");
    for (row, (idx, color)) in entries.iter().enumerate() {
        let y = 20.0 + row as f32 * LEGEND_ROW;
        out.push_str(&format!(
            "<line x1=\"16\" y1=\"{y:.2}\" x2=\"40\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"3\"/>\
<text x=\"46\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">Yo'l {}</text>",
            escape_xml(color),
            y + 4.0,
            escape_xml(&theme.font_family),
            theme.font_size,
            escape_xml(&theme.text_color),
            idx + 1
        ));
    }
    out.push_str("</g>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(family) = theme.font_family.split(',').next() {
        opt.font_family = family.trim().to_string();
    }
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    log::info!("wrote {}x{} png to {}", size.width(), size.height(), output.display());
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
