pub mod canvas;
pub mod constants;
pub mod detail;
pub mod diagram;
pub mod help;
pub mod status_line;

use crate::app::{AppMode, AppState};
use detail::DetailPanelRenderer;
use diagram::DiagramRenderer;
use help::HelpRenderer;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use status_line::StatusLineRenderer;

pub fn render(frame: &mut Frame, app: &mut AppState) {
    let size = frame.area();
    app.terminal_width = size.width;
    app.terminal_height = size.height;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    match app.mode {
        AppMode::Help => HelpRenderer::render(frame, chunks[0]),
        AppMode::Normal => {
            let canvas_area = Rect {
                width: app.canvas_columns(),
                ..chunks[0]
            };
            DiagramRenderer::new(app).render(frame, canvas_area);

            if app.detail_visible() {
                if let Some(detail) = app.canvas.selected_detail() {
                    let panel = Rect {
                        x: canvas_area.right(),
                        width: chunks[0].width.saturating_sub(canvas_area.width),
                        ..chunks[0]
                    };
                    DetailPanelRenderer::render(frame, &detail, panel);
                }
            }
        }
    }

    StatusLineRenderer::render(frame, app, chunks[1]);
}
