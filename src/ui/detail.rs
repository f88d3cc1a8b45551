use crate::selection::NodeDetail;
use crate::ui::constants::{palette_color, LEAF_HINT};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Side panel for the selected node.
pub struct DetailPanelRenderer;

impl DetailPanelRenderer {
    pub fn render(frame: &mut Frame, detail: &NodeDetail, area: Rect) {
        let block = Block::default()
            .title(" Details (Esc to close) ")
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(palette_color(detail.color)));

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(Self::lines(detail))
                .block(block)
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    pub fn lines(detail: &NodeDetail) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                detail.label.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];

        lines.extend(detail.content.lines().map(|l| Line::from(l.to_string())));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "CONNECTIONS",
            Style::default().fg(Color::DarkGray),
        )));

        if detail.is_leaf() {
            lines.push(Line::from(Span::styled(
                LEAF_HINT,
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.extend(
                detail
                    .children
                    .iter()
                    .map(|label| Line::from(format!("• {label}"))),
            );
        }

        lines
    }
}
