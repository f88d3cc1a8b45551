use crate::ui::constants::{border, CharBuffer, StyleBuffer};
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

/// Character grid the diagram is drawn into before it becomes a paragraph.
/// Coordinates are signed so shapes may hang off any edge; out-of-range
/// cells are dropped.
pub struct BufferCanvas {
    pub char_buffer: CharBuffer,
    pub style_buffer: StyleBuffer,
    pub width: usize,
    pub height: usize,
}

impl BufferCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            char_buffer: vec![vec![' '; width]; height],
            style_buffer: vec![vec![Style::default(); width]; height],
            width,
            height,
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn set_char(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if self.in_bounds(x, y) {
            self.char_buffer[y as usize][x as usize] = ch;
            self.style_buffer[y as usize][x as usize] = style;
        }
    }

    pub fn get_char(&self, x: i32, y: i32) -> Option<char> {
        self.in_bounds(x, y)
            .then(|| self.char_buffer[y as usize][x as usize])
    }

    /// Writes `text` from column `x`, stopping before `max_x`. Wide
    /// characters take two cells; the second one is left blank.
    pub fn draw_text(&mut self, x: i32, y: i32, max_x: i32, text: &str, style: Style) {
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as i32;
            if w == 0 {
                continue;
            }
            if col + w > max_x {
                break;
            }
            self.set_char(col, y, ch, style);
            if w == 2 {
                self.set_char(col + 1, y, ' ', style);
            }
            col += w;
        }
    }

    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, style: Style) {
        for y in y0.max(0)..=y1.min(self.height as i32 - 1) {
            for x in x0.max(0)..=x1.min(self.width as i32 - 1) {
                self.set_char(x, y, ' ', style);
            }
        }
    }

    /// Rounded box with inclusive corners.
    pub fn draw_box(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, style: Style) {
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        for x in x0 + 1..x1 {
            self.set_char(x, y0, border::HORIZONTAL, style);
            self.set_char(x, y1, border::HORIZONTAL, style);
        }
        for y in y0 + 1..y1 {
            self.set_char(x0, y, border::VERTICAL, style);
            self.set_char(x1, y, border::VERTICAL, style);
        }
        self.set_char(x0, y0, border::TOP_LEFT, style);
        self.set_char(x1, y0, border::TOP_RIGHT, style);
        self.set_char(x0, y1, border::BOTTOM_LEFT, style);
        self.set_char(x1, y1, border::BOTTOM_RIGHT, style);
    }

    pub fn to_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();

        for (y, row) in self.char_buffer.iter().enumerate() {
            let mut spans = Vec::new();
            let mut current_style = Style::default();
            let mut current_text = String::new();

            for (x, &ch) in row.iter().enumerate() {
                let style = self.style_buffer[y][x];
                if style != current_style {
                    if !current_text.is_empty() {
                        spans.push(Span::styled(current_text.clone(), current_style));
                        current_text.clear();
                    }
                    current_style = style;
                }
                current_text.push(ch);
            }

            if !current_text.is_empty() {
                spans.push(Span::styled(current_text, current_style));
            }

            lines.push(Line::from(spans));
        }

        lines
    }

    pub fn row_text(&self, y: usize) -> String {
        self.char_buffer
            .get(y)
            .map(|row| row.iter().collect())
            .unwrap_or_default()
    }
}
