use crate::errors::RouteError;
use crate::geometry::{Point, Rect};
use crate::layout::{CardGeometry, Layout};
use crate::model::{Forest, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorStyle {
    Straight,
    Curved,
    #[default]
    Step,
}

impl ConnectorStyle {
    pub const ALL: [ConnectorStyle; 3] = [
        ConnectorStyle::Step,
        ConnectorStyle::Curved,
        ConnectorStyle::Straight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorStyle::Straight => "straight",
            ConnectorStyle::Curved => "curved",
            ConnectorStyle::Step => "step",
        }
    }

    /// Next style in toolbar order: step, curved, straight.
    pub fn next(self) -> Self {
        match self {
            ConnectorStyle::Step => ConnectorStyle::Curved,
            ConnectorStyle::Curved => ConnectorStyle::Straight,
            ConnectorStyle::Straight => ConnectorStyle::Step,
        }
    }
}

impl fmt::Display for ConnectorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectorStyle {
    type Err = RouteError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "straight" => Ok(ConnectorStyle::Straight),
            "curved" => Ok(ConnectorStyle::Curved),
            "step" => Ok(ConnectorStyle::Step),
            _ => Err(RouteError::InvalidStyle(tag.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
}

impl PathCommand {
    fn target(&self) -> Point {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
            PathCommand::CubicTo { to, .. } => to,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorPath {
    pub style: ConnectorStyle,
    pub commands: Vec<PathCommand>,
}

impl ConnectorPath {
    pub fn start(&self) -> Point {
        self.commands
            .first()
            .map(PathCommand::target)
            .unwrap_or_default()
    }

    pub fn end(&self) -> Point {
        self.commands
            .last()
            .map(PathCommand::target)
            .unwrap_or_default()
    }

    /// SVG `d` attribute.
    pub fn to_svg_path(&self) -> String {
        self.commands
            .iter()
            .map(|cmd| match cmd {
                PathCommand::MoveTo(p) => format!("M {} {}", p.x, p.y),
                PathCommand::LineTo(p) => format!("L {} {}", p.x, p.y),
                PathCommand::CubicTo { c1, c2, to } => {
                    format!("C {} {}, {} {}, {} {}", c1.x, c1.y, c2.x, c2.y, to.x, to.y)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Polyline approximation; each cubic contributes `samples` segments.
    pub fn flatten(&self, samples: usize) -> Vec<Point> {
        let samples = samples.max(1);
        let mut points: Vec<Point> = Vec::new();

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => points.push(p),
                PathCommand::CubicTo { c1, c2, to } => {
                    let from = points.last().copied().unwrap_or(c1);
                    for i in 1..=samples {
                        let t = i as f64 / samples as f64;
                        points.push(cubic_point(from, c1, c2, to, t));
                    }
                }
            }
        }

        points
    }
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Right-edge port of the parent card.
pub fn parent_anchor(parent: Point, card: &CardGeometry) -> Point {
    Point::new(parent.x + card.width, parent.y + card.port_offset)
}

/// Left-edge port of the child card.
pub fn child_anchor(child: Point, card: &CardGeometry) -> Point {
    Point::new(child.x, child.y + card.port_offset)
}

/// Path between the ports of a parent and a child card. The anchors depend
/// only on the positions and the card geometry, never on `style`.
pub fn route(
    parent: Point,
    child: Point,
    style: ConnectorStyle,
    card: &CardGeometry,
) -> ConnectorPath {
    let start = parent_anchor(parent, card);
    let end = child_anchor(child, card);
    let mid_x = (start.x + end.x) / 2.0;

    let commands = match style {
        ConnectorStyle::Straight => vec![PathCommand::MoveTo(start), PathCommand::LineTo(end)],
        ConnectorStyle::Curved => vec![
            PathCommand::MoveTo(start),
            PathCommand::CubicTo {
                c1: Point::new(mid_x, start.y),
                c2: Point::new(mid_x, end.y),
                to: end,
            },
        ],
        ConnectorStyle::Step => vec![
            PathCommand::MoveTo(start),
            PathCommand::LineTo(Point::new(mid_x, start.y)),
            PathCommand::LineTo(Point::new(mid_x, end.y)),
            PathCommand::LineTo(end),
        ],
    };

    ConnectorPath { style, commands }
}

/// Same as [`route`] but takes the style as a tag from the host.
pub fn route_tagged(
    parent: Point,
    child: Point,
    tag: &str,
    card: &CardGeometry,
) -> Result<ConnectorPath, RouteError> {
    Ok(route(parent, child, tag.parse()?, card))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
    pub path: ConnectorPath,
}

/// Box holding every style's path between the two cards' ports. Padded so
/// flat runs still have area.
pub fn edge_bounds(parent: Point, child: Point, card: &CardGeometry) -> Rect {
    let (start, end) = (parent_anchor(parent, card), child_anchor(child, card));
    let (left, top) = (start.x.min(end.x), start.y.min(end.y));
    Rect::new(
        left - 1.0,
        top - 1.0,
        (start.x - end.x).abs() + 2.0,
        (start.y - end.y).abs() + 2.0,
    )
}

/// One edge per parent/child pair, parents in pre-order.
pub fn route_forest(
    forest: &Forest,
    layout: &Layout,
    style: ConnectorStyle,
    card: &CardGeometry,
) -> Vec<Edge> {
    route_pairs(forest, layout, style, card, |_| true)
}

/// Like [`route_forest`], but only routes edges whose bounds meet `visible`.
pub fn route_visible(
    forest: &Forest,
    layout: &Layout,
    style: ConnectorStyle,
    card: &CardGeometry,
    visible: &Rect,
) -> Vec<Edge> {
    route_pairs(forest, layout, style, card, |bounds| {
        bounds.intersects(visible)
    })
}

fn route_pairs(
    forest: &Forest,
    layout: &Layout,
    style: ConnectorStyle,
    card: &CardGeometry,
    keep: impl Fn(&Rect) -> bool,
) -> Vec<Edge> {
    let mut edges = Vec::new();

    for &parent in &layout.order {
        let Some(parent_layout) = layout.get(parent) else {
            continue;
        };
        let from = parent_layout.position();

        for child in forest.children(parent) {
            let Some(child_layout) = layout.get(child) else {
                continue;
            };
            let to = child_layout.position();
            if keep(&edge_bounds(from, to, card)) {
                edges.push(Edge {
                    parent,
                    child,
                    path: route(from, to, style, card),
                });
            }
        }
    }

    edges
}
