use crate::app::{AppMode, AppState};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

pub struct StatusLineRenderer;

impl StatusLineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let (content, style) = Self::get_content_and_style(app);
        frame.render_widget(Paragraph::new(content).style(style), area);
    }

    pub fn get_content_and_style(app: &AppState) -> (String, Style) {
        if let Some(ref msg) = app.message {
            return (
                msg.clone(),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            );
        }

        let content = match app.mode {
            AppMode::Help => "Help | press ? or Esc to close".to_string(),
            AppMode::Normal => {
                let canvas = &app.canvas;
                let name = app
                    .filename
                    .as_ref()
                    .and_then(|f| f.file_name())
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "untitled".to_string());
                format!(
                    "{} | {} nodes | {}% | {} | drag to pan, scroll to zoom, ? for help",
                    name,
                    canvas.forest().len(),
                    (canvas.viewport.scale() * 100.0).round(),
                    canvas.style()
                )
            }
        };

        (content, Style::default().fg(Color::Gray).bg(Color::Black))
    }
}
