use crate::app::{AppMode, AppState};
use crate::export;
use crate::selection::Gesture;
use crate::viewport::ZOOM_STEP;
use anyhow::Result;
use std::path::PathBuf;

/// Cells moved per keyboard pan
const PAN_STEP_CELLS: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,

    // Mouse, in terminal cells
    PointerDown { column: u16, row: u16 },
    PointerMove { column: u16, row: u16 },
    PointerUp,
    Wheel { column: u16, row: u16, delta: f64 },

    // View control
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
    ResetView,
    CycleStyle,
    ClearSelection,

    // Export
    ExportSvg,
    ExportJson,

    ToggleHelp,
    Resize { width: u16, height: u16 },
}

pub fn execute_action(action: Action, app: &mut AppState) -> Result<()> {
    if !matches!(action, Action::PointerMove { .. } | Action::Resize { .. }) {
        app.clear_message();
    }

    match action {
        Action::Quit => app.running = false,

        Action::PointerDown { column, row } => {
            if app.in_canvas(column, row) {
                let screen = app.cell_to_screen(column, row);
                app.canvas.pointer_down(screen);
            }
        }
        Action::PointerMove { column, row } => {
            let screen = app.cell_to_screen(column, row);
            app.canvas.pointer_move(screen);
        }
        Action::PointerUp => {
            if app.canvas.pointer_up() == Gesture::BackgroundClick {
                app.set_message("Selection cleared");
            }
        }
        Action::Wheel { column, row, delta } => {
            if app.in_canvas(column, row) {
                let screen = app.cell_to_screen(column, row);
                app.canvas.wheel(screen, delta);
            }
        }

        Action::PanLeft => pan_cells(app, PAN_STEP_CELLS, 0.0),
        Action::PanRight => pan_cells(app, -PAN_STEP_CELLS, 0.0),
        Action::PanUp => pan_cells(app, 0.0, PAN_STEP_CELLS / 2.0),
        Action::PanDown => pan_cells(app, 0.0, -PAN_STEP_CELLS / 2.0),
        Action::ZoomIn => {
            let center = app.viewport_center();
            app.canvas.viewport.zoom_by_step(center, ZOOM_STEP);
        }
        Action::ZoomOut => {
            let center = app.viewport_center();
            app.canvas.viewport.zoom_by_step(center, -ZOOM_STEP);
        }
        Action::ResetView => {
            app.canvas.viewport.reset();
            app.set_message("View reset");
        }
        Action::CycleStyle => {
            let style = app.canvas.cycle_style();
            app.set_message(format!("Connector style: {style}"));
        }
        Action::ClearSelection => app.canvas.clear_selection(),

        Action::ExportSvg => {
            let path = export_path(app, "svg");
            export::save_svg(&app.canvas, &path)?;
            app.set_message(format!("Exported {}", path.display()));
        }
        Action::ExportJson => {
            let path = export_path(app, "layout.json");
            export::save_snapshot(&app.canvas, &path)?;
            app.set_message(format!("Exported {}", path.display()));
        }

        Action::ToggleHelp => {
            app.mode = match app.mode {
                AppMode::Help => AppMode::Normal,
                AppMode::Normal => AppMode::Help,
            };
        }
        Action::Resize { width, height } => {
            app.terminal_width = width;
            app.terminal_height = height;
        }
    }

    Ok(())
}

/// Pans by whole cells so keyboard steps look the same at every zoom level.
fn pan_cells(app: &mut AppState, columns: f64, rows: f64) {
    app.canvas.viewport.pan(
        columns * app.config.cell_width,
        rows * app.config.cell_height,
    );
}

fn export_path(app: &AppState, extension: &str) -> PathBuf {
    app.filename
        .as_ref()
        .map(|f| f.with_extension(extension))
        .unwrap_or_else(|| PathBuf::from(format!("concept-canvas.{extension}")))
}
