use crate::actions::Action;
use crate::app::{AppMode, AppState};
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

/// Wheel delta reported per scroll notch, matching a browser's deltaY sign.
const WHEEL_NOTCH: f64 = 100.0;

pub fn handle_events(app: &AppState) -> Result<Option<Action>> {
    if event::poll(Duration::from_millis(16))? {
        return Ok(translate_event(app, event::read()?));
    }
    Ok(None)
}

pub fn translate_event(app: &AppState, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(width, height) => Some(Action::Resize { width, height }),
        // Leaving the terminal window ends any drag.
        Event::FocusLost => Some(Action::PointerUp),
        _ => None,
    }
}

fn handle_key_event(app: &AppState, key: KeyEvent) -> Option<Action> {
    match app.mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Help => handle_help_mode(key),
    }
}

fn handle_normal_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Char('q'), _) => Some(Action::Quit),
        (Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),

        (Char('h'), _) | (Left, _) => Some(Action::PanLeft),
        (Char('l'), _) | (Right, _) => Some(Action::PanRight),
        (Char('k'), _) | (Up, _) => Some(Action::PanUp),
        (Char('j'), _) | (Down, _) => Some(Action::PanDown),

        (Char('+'), _) | (Char('='), _) => Some(Action::ZoomIn),
        (Char('-'), _) | (Char('_'), _) => Some(Action::ZoomOut),
        (Char('0'), _) => Some(Action::ResetView),

        (Char('s'), _) => Some(Action::CycleStyle),
        (Esc, _) => Some(Action::ClearSelection),

        (Char('x'), _) => Some(Action::ExportSvg),
        (Char('X'), _) => Some(Action::ExportJson),

        (Char('?'), _) => Some(Action::ToggleHelp),
        _ => None,
    }
}

fn handle_help_mode(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Esc => Some(Action::ToggleHelp),
        _ => None,
    }
}

fn handle_mouse_event(app: &AppState, mouse: MouseEvent) -> Option<Action> {
    let (column, row) = (mouse.column, mouse.row);

    if app.mode == AppMode::Help {
        return None;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::PointerDown { column, row }),
        MouseEventKind::Drag(MouseButton::Left) => Some(Action::PointerMove { column, row }),
        MouseEventKind::Up(MouseButton::Left) => Some(Action::PointerUp),
        MouseEventKind::ScrollUp => Some(Action::Wheel {
            column,
            row,
            delta: -WHEEL_NOTCH,
        }),
        MouseEventKind::ScrollDown => Some(Action::Wheel {
            column,
            row,
            delta: WHEEL_NOTCH,
        }),
        _ => None,
    }
}
