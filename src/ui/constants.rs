use ratatui::style::{Color, Style};

pub type CharBuffer = Vec<Vec<char>>;
pub type StyleBuffer = Vec<Vec<Style>>;

pub const PORT_DOT: char = '●';
/// Samples per cubic when rasterizing curved connectors
pub const CURVE_SAMPLES: usize = 24;
pub const LEAF_HINT: &str = "End Node (Leaf)";

pub mod border {
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
    pub const TOP_LEFT: char = '╭';
    pub const TOP_RIGHT: char = '╮';
    pub const BOTTOM_LEFT: char = '╰';
    pub const BOTTOM_RIGHT: char = '╯';
}

pub mod wire {
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
    pub const RISING: char = '╱';
    pub const FALLING: char = '╲';
}

pub const EDGE_COLOR: Color = Color::DarkGray;
pub const PORT_COLOR: Color = Color::Cyan;
pub const SELECTED_COLOR: Color = Color::Cyan;

/// Terminal color for a palette entry.
pub fn palette_color(name: &str) -> Color {
    match name {
        "primary" => Color::Rgb(244, 114, 182),
        "secondary" => Color::Rgb(129, 140, 248),
        "accent" => Color::Rgb(34, 211, 238),
        "purple" => Color::Rgb(168, 85, 247),
        _ => Color::Rgb(236, 72, 153),
    }
}
