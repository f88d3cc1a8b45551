use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct HelpSection {
    pub title: &'static str,
    pub items: &'static [(&'static str, &'static str)],
}

pub const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Mouse:",
        items: &[
            ("drag     ", "Pan the canvas"),
            ("scroll   ", "Zoom at the pointer"),
            ("click    ", "Select a node, or clear on background"),
        ],
    },
    HelpSection {
        title: "View:",
        items: &[
            ("h/←  l/→ ", "Pan left / right"),
            ("k/↑  j/↓ ", "Pan up / down"),
            ("+ / -    ", "Zoom in / out"),
            ("0        ", "Reset view"),
            ("s        ", "Cycle connector style"),
            ("Esc      ", "Close details"),
        ],
    },
    HelpSection {
        title: "File:",
        items: &[
            ("x        ", "Export SVG"),
            ("X        ", "Export layout JSON"),
            ("q        ", "Quit"),
        ],
    },
];

pub struct HelpRenderer;

impl HelpRenderer {
    pub fn render(frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Help ");
        let paragraph = Paragraph::new(Self::build_help_text())
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    pub fn build_help_text() -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![Span::styled(
                "Concept Canvas Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        for section in SECTIONS {
            lines.push(Line::from(vec![Span::styled(
                section.title,
                Style::default().add_modifier(Modifier::BOLD),
            )]));

            for (key, desc) in section.items {
                lines.push(Line::from(format!("  {}  {}", key, desc)));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from("Press ? or Esc to close help"));
        lines
    }
}
