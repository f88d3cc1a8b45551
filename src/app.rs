use crate::canvas::ConceptCanvas;
use crate::config::AppConfig;
use crate::errors::StructuralError;
use crate::geometry::Point;
use crate::model::Forest;
use std::path::PathBuf;

/// Columns taken by the detail panel when a node is selected
pub const DETAIL_PANEL_WIDTH: u16 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
}

pub struct AppState {
    pub running: bool,
    pub mode: AppMode,
    pub canvas: ConceptCanvas,
    pub config: AppConfig,
    pub filename: Option<PathBuf>,
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            running: true,
            mode: AppMode::Normal,
            canvas: ConceptCanvas::from_config(&config),
            filename: config.filename.clone(),
            config,
            terminal_width: 80,
            terminal_height: 24,
            message: None,
        }
    }

    pub fn load_forest(&mut self, forest: Forest) -> Result<(), StructuralError> {
        self.canvas.replace_forest(forest)?;
        self.set_message(format!("Loaded {} nodes", self.canvas.forest().len()));
        Ok(())
    }

    /// Screen pixel at the top-left corner of a terminal cell.
    pub fn cell_to_screen(&self, column: u16, row: u16) -> Point {
        Point::new(
            column as f64 * self.config.cell_width,
            row as f64 * self.config.cell_height,
        )
    }

    /// Fractional cell coordinates of a screen pixel.
    pub fn screen_to_cell(&self, screen: Point) -> (f64, f64) {
        (
            screen.x / self.config.cell_width,
            screen.y / self.config.cell_height,
        )
    }

    /// Rows available to the diagram (everything but the status line).
    pub fn canvas_rows(&self) -> u16 {
        self.terminal_height.saturating_sub(1)
    }

    /// Columns available to the diagram.
    pub fn canvas_columns(&self) -> u16 {
        if self.detail_visible() {
            self.terminal_width.saturating_sub(DETAIL_PANEL_WIDTH)
        } else {
            self.terminal_width
        }
    }

    pub fn detail_visible(&self) -> bool {
        self.canvas.selection().selected().is_some()
            && self.terminal_width > DETAIL_PANEL_WIDTH * 2
    }

    /// Whether a mouse event at this cell belongs to the diagram.
    pub fn in_canvas(&self, column: u16, row: u16) -> bool {
        column < self.canvas_columns() && row < self.canvas_rows()
    }

    pub fn viewport_center(&self) -> Point {
        self.cell_to_screen(self.canvas_columns() / 2, self.canvas_rows() / 2)
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}
