use crate::app::AppState;
use crate::geometry::{Point, Rect as WorldRect};
use crate::layout::palette_name;
use crate::model::NodeId;
use crate::ui::canvas::BufferCanvas;
use crate::ui::constants::{
    palette_color, wire, CURVE_SAMPLES, EDGE_COLOR, PORT_COLOR, PORT_DOT, SELECTED_COLOR,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

/// Draws connectors, then cards on top, through the current viewport.
pub struct DiagramRenderer<'a> {
    app: &'a AppState,
}

impl<'a> DiagramRenderer<'a> {
    pub fn new(app: &'a AppState) -> Self {
        Self { app }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let canvas = self.draw(area.width as usize, area.height as usize);
        frame.render_widget(Paragraph::new(canvas.to_lines()), area);
    }

    pub fn draw(&self, width: usize, height: usize) -> BufferCanvas {
        let mut canvas = BufferCanvas::new(width, height);
        self.draw_edges(&mut canvas);
        self.draw_cards(&mut canvas);
        canvas
    }

    /// World point to fractional cell coordinates.
    fn to_cell(&self, world: Point) -> (f64, f64) {
        let screen = self.app.canvas.viewport.world_to_screen(world);
        self.app.screen_to_cell(screen)
    }

    /// World-space area covered by a `width` x `height` cell canvas.
    fn visible_world(&self, width: usize, height: usize) -> WorldRect {
        let screen_w = width as f64 * self.app.config.cell_width;
        let screen_h = height as f64 * self.app.config.cell_height;
        self.app
            .canvas
            .viewport
            .visible_world_rect(screen_w, screen_h)
    }

    fn draw_edges(&self, canvas: &mut BufferCanvas) {
        let style = Style::default().fg(EDGE_COLOR);
        let port_style = Style::default().fg(PORT_COLOR);
        let visible = self.visible_world(canvas.width, canvas.height);

        for edge in self.app.canvas.visible_edges(&visible) {
            let cells: Vec<(f64, f64)> = edge
                .path
                .flatten(CURVE_SAMPLES)
                .into_iter()
                .map(|p| self.to_cell(p))
                .collect();

            for pair in cells.windows(2) {
                draw_segment(canvas, pair[0], pair[1], style);
            }

            for port in [edge.path.start(), edge.path.end()] {
                let (x, y) = self.to_cell(port);
                canvas.set_char(x.floor() as i32, y.floor() as i32, PORT_DOT, port_style);
            }
        }
    }

    fn draw_cards(&self, canvas: &mut BufferCanvas) {
        let visible = self.visible_world(canvas.width, canvas.height);
        let layout = self.app.canvas.layout();
        let card = self.app.canvas.card();

        for node_id in layout.visible_nodes(&visible, card) {
            self.draw_card(canvas, node_id);
        }
    }

    fn draw_card(&self, canvas: &mut BufferCanvas, node_id: NodeId) {
        let forest = self.app.canvas.forest();
        let (Some(node), Some(placed)) = (
            forest.get(node_id),
            self.app.canvas.layout().get(node_id),
        ) else {
            return;
        };
        let rect = placed.card(self.app.canvas.card());

        let (left, top) = self.to_cell(Point::new(rect.x, rect.y));
        let (right, bottom) = self.to_cell(Point::new(rect.right(), rect.bottom()));
        let (x0, y0) = (left.floor() as i32, top.floor() as i32);
        // Keep at least a 3x3 box so tiny zoom levels still show something.
        let x1 = (right.ceil() as i32 - 1).max(x0 + 2);
        let y1 = (bottom.ceil() as i32 - 1).max(y0 + 2);

        let selected = self.app.canvas.selection().selected() == Some(node.identity.as_str());
        let accent = palette_color(palette_name(placed.color));
        let border_style = if selected {
            Style::default()
                .fg(SELECTED_COLOR)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        canvas.fill_rect(x0, y0, x1, y1, Style::default());
        canvas.draw_box(x0, y0, x1, y1, border_style);

        // Depth stripe down the left edge.
        for y in y0 + 1..y1 {
            canvas.set_char(x0 + 1, y, '▌', Style::default().fg(accent));
        }

        let text_x = x0 + 3;
        let label_style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        canvas.draw_text(text_x, y0 + 1, x1, &node.label, label_style);

        let body_style = Style::default().fg(Color::Gray);
        let body_width = (x1 - text_x).max(0) as usize;
        for (i, line) in wrap_to_width(&node.content, body_width)
            .iter()
            .take((y1 - y0 - 2).max(0) as usize)
            .enumerate()
        {
            canvas.draw_text(text_x, y0 + 2 + i as i32, x1, line, body_style);
        }

        // Ports sit on the card edges at the port offset.
        let port_y = self
            .to_cell(Point::new(rect.x, rect.y + self.app.canvas.card().port_offset))
            .1
            .floor() as i32;
        let port_style = Style::default().fg(PORT_COLOR);
        if port_y > y0 && port_y < y1 {
            canvas.set_char(x0, port_y, PORT_DOT, port_style);
            canvas.set_char(x1, port_y, PORT_DOT, port_style);
        }
    }
}

/// Plots a straight segment between two fractional cell positions and
/// returns how many cells it visited. Only the part inside the canvas is
/// walked.
fn draw_segment(
    canvas: &mut BufferCanvas,
    from: (f64, f64),
    to: (f64, f64),
    style: Style,
) -> usize {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    // Cells are about twice as tall as wide.
    let ch = if dx.abs() >= 2.0 * dy.abs() {
        wire::HORIZONTAL
    } else if dy.abs() >= 2.0 * dx.abs() {
        wire::VERTICAL
    } else if (dx > 0.0) == (dy > 0.0) {
        wire::FALLING
    } else {
        wire::RISING
    };

    let limit = (canvas.width as f64 + 1.0, canvas.height as f64 + 1.0);
    let Some((from, to)) = clip_segment(from, to, (-1.0, -1.0), limit) else {
        return 0;
    };
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);

    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = (from.0 + dx * t).floor() as i32;
        let y = (from.1 + dy * t).floor() as i32;
        canvas.set_char(x, y, ch, style);
    }
    steps + 1
}

/// Liang-Barsky clip of a segment to the box spanned by `min` and `max`.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [
        (-dx, from.0 - min.0),
        (dx, max.0 - from.0),
        (-dy, from.1 - min.1),
        (dy, max.1 - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    if t0 > t1 || !t0.is_finite() || !t1.is_finite() {
        return None;
    }
    Some((
        (from.0 + dx * t0, from.1 + dy * t0),
        (from.0 + dx * t1, from.1 + dy * t1),
    ))
}

/// Greedy word wrap measured in display columns.
pub fn wrap_to_width(text: &str, max_width: usize) -> Vec<String> {
    use unicode_width::UnicodeWidthStr;

    if max_width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::model::{ConceptNode, Forest};
    use crate::source::parse_forest;

    fn create_test_app() -> AppState {
        let mut app = AppState::new(AppConfig::default());
        let forest = parse_forest(
            r#"[{"id": "A", "label": "Root", "content": "Main topic", "children": [
                {"id": "B", "label": "Child 1"}, {"id": "C", "label": "Child 2"}]}]"#,
        )
        .unwrap();
        app.load_forest(forest).unwrap();
        app
    }

    fn all_text(canvas: &BufferCanvas) -> String {
        (0..canvas.height)
            .map(|y| canvas.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_cards_are_drawn_at_viewport_position() {
        let app = create_test_app();
        let canvas = DiagramRenderer::new(&app).draw(160, 40);

        // A: world (0, 75) -> screen (100, 175) -> cell (12, 10).
        assert_eq!(canvas.get_char(12, 10), Some('╭'));
        assert!(canvas.row_text(11).contains("Root"));
        assert!(all_text(&canvas).contains("Child 1"));
        assert!(all_text(&canvas).contains("Main topic"));
    }

    #[test]
    fn test_edges_and_ports_are_drawn() {
        let app = create_test_app();
        let text = all_text(&DiagramRenderer::new(&app).draw(160, 40));
        assert!(text.contains(PORT_DOT));
        assert!(text.contains(wire::VERTICAL));
    }

    #[test]
    fn test_panned_away_draws_nothing() {
        let mut app = create_test_app();
        app.canvas.viewport.pan(-100_000.0, 0.0);
        let text = all_text(&DiagramRenderer::new(&app).draw(80, 20));
        assert!(text.chars().all(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn test_wrap_to_width() {
        assert_eq!(
            wrap_to_width("the quick brown fox", 9),
            vec!["the quick", "brown fox"]
        );
        assert!(wrap_to_width("anything", 0).is_empty());
        assert_eq!(wrap_to_width("supercalifragilistic", 5), vec!["supercalifragilistic"]);
    }

    #[test]
    fn test_offscreen_segment_visits_nothing() {
        let mut canvas = BufferCanvas::new(80, 20);
        let style = Style::default();
        assert_eq!(draw_segment(&mut canvas, (-1e6, 5.0), (-5e5, 5.0), style), 0);
        assert_eq!(draw_segment(&mut canvas, (10.0, -9e5), (70.0, -8e5), style), 0);
    }

    #[test]
    fn test_long_segment_is_clipped_to_canvas() {
        let mut canvas = BufferCanvas::new(80, 20);
        let visited = draw_segment(&mut canvas, (-1e6, 5.5), (1e6, 5.5), Style::default());

        assert!(visited <= 84, "visited {visited} cells");
        assert!(canvas.row_text(5).chars().all(|c| c == wire::HORIZONTAL));
    }

    #[test]
    fn test_clip_segment() {
        let clipped = clip_segment((-10.0, 0.0), (10.0, 0.0), (0.0, -1.0), (5.0, 1.0));
        assert_eq!(clipped, Some(((0.0, 0.0), (5.0, 0.0))));
        assert_eq!(
            clip_segment((-10.0, 5.0), (10.0, 5.0), (0.0, -1.0), (5.0, 1.0)),
            None
        );
    }

    #[test]
    fn test_wide_tree_routes_only_visible_edges() {
        let mut app = AppState::new(AppConfig::default());
        let mut forest = Forest::new();
        let root = forest.add_root(ConceptNode::new("root", "Root"));
        for i in 0..2000 {
            forest.add_child(root, ConceptNode::new(format!("leaf-{i}"), "Leaf"));
        }
        app.load_forest(forest).unwrap();

        let renderer = DiagramRenderer::new(&app);
        let visible = renderer.visible_world(80, 20);
        // Every edge starts at the root's port far below; only the first
        // two children come close enough to the top of the map.
        assert_eq!(app.canvas.edges().len(), 2000);
        assert_eq!(app.canvas.visible_edges(&visible).len(), 2);

        let canvas = renderer.draw(80, 20);
        assert!(all_text(&canvas).contains(wire::VERTICAL));
    }
}
