use crate::canvas::ConceptCanvas;
use crate::errors::CanvasResult;
use crate::layout::palette_name;
use crate::routing::ConnectorStyle;
use crate::viewport::Transform;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub identity: String,
    pub label: String,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub top: f64,
    pub subtree_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    pub nodes: Vec<PlacedNode>,
    pub transform: Transform,
    pub style: ConnectorStyle,
    pub selected: Option<String>,
}

impl CanvasSnapshot {
    /// Nodes are listed in pre-order.
    pub fn capture(canvas: &ConceptCanvas) -> Self {
        let forest = canvas.forest();
        let layout = canvas.layout();

        let nodes = layout
            .order
            .iter()
            .filter_map(|id| {
                let node = forest.get(*id)?;
                let placed = layout.get(*id)?;
                Some(PlacedNode {
                    identity: node.identity.clone(),
                    label: node.label.clone(),
                    depth: placed.depth,
                    x: placed.x,
                    y: placed.y,
                    color: palette_name(placed.color).to_string(),
                    top: placed.top,
                    subtree_height: placed.subtree_height,
                })
            })
            .collect();

        Self {
            nodes,
            transform: canvas.viewport.transform(),
            style: canvas.style(),
            selected: canvas.selection().selected().map(str::to_string),
        }
    }

    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> CanvasResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

pub fn save_snapshot(canvas: &ConceptCanvas, path: &Path) -> CanvasResult<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &CanvasSnapshot::capture(canvas))?;
    info!(path = %path.display(), "snapshot written");
    Ok(())
}

fn palette_hex(name: &str) -> &'static str {
    match name {
        "primary" => "#f472b6",
        "secondary" => "#818cf8",
        "accent" => "#22d3ee",
        "purple" => "#a855f7",
        _ => "#ec4899",
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Whole-diagram SVG: edges, port dots and cards, with the viewport
/// transform applied to a single group.
pub fn render_svg(canvas: &ConceptCanvas) -> String {
    let card = canvas.card();
    let bounds = canvas.layout().bounds(card);
    let transform = canvas.viewport.transform();
    let width = (bounds.right() * transform.scale + transform.pan_x).max(0.0).ceil();
    let height = (bounds.bottom() * transform.scale + transform.pan_y).max(0.0).ceil();

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">\n"
    ));
    svg.push_str(&format!(
        "<g transform=\"translate({} {}) scale({})\">\n",
        transform.pan_x, transform.pan_y, transform.scale
    ));

    for edge in canvas.edges() {
        let (start, end) = (edge.path.start(), edge.path.end());
        svg.push_str(&format!(
            r##"<path d="{}" fill="none" stroke="#64748b" stroke-opacity="0.4" stroke-width="2"/>"##,
            edge.path.to_svg_path()
        ));
        svg.push('\n');
        for port in [start, end] {
            svg.push_str(&format!(
                r##"<circle cx="{}" cy="{}" r="3" fill="#22d3ee"/>"##,
                port.x, port.y
            ));
            svg.push('\n');
        }
    }

    let forest = canvas.forest();
    let layout = canvas.layout();
    for id in &layout.order {
        let (Some(node), Some(placed)) = (forest.get(*id), layout.get(*id)) else {
            continue;
        };
        let color = palette_hex(palette_name(placed.color));
        svg.push_str(&format!(
            r##"<g class="node-card" data-id="{}"><rect x="{}" y="{}" width="{}" height="{}" rx="12" fill="#1e1b2e" stroke="{color}"/><rect x="{}" y="{}" width="6" height="{}" fill="{color}"/><text x="{}" y="{}" fill="#f8fafc" font-size="14" font-weight="bold">{}</text></g>"##,
            escape_xml(&node.identity),
            placed.x,
            placed.y,
            card.width,
            card.height,
            placed.x,
            placed.y,
            card.height,
            placed.x + 18.0,
            placed.y + 28.0,
            escape_xml(&node.label)
        ));
        svg.push('\n');
    }

    svg.push_str("</g>\n</svg>\n");
    svg
}

pub fn save_svg(canvas: &ConceptCanvas, path: &Path) -> CanvasResult<()> {
    fs::write(path, render_svg(canvas))?;
    info!(path = %path.display(), "svg written");
    Ok(())
}
