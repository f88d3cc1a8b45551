use crate::geometry::Point;
use crate::layout::{palette_name, Layout};
use crate::model::Forest;
use crate::viewport::Viewport;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { last: Point, moved: bool },
}

/// What a finished pointer gesture amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    None,
    /// Pressed and released on the background without moving.
    BackgroundClick,
    DragEnded,
}

/// Tracks the selected node and tells background drags apart from node clicks.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionController {
    state: DragState,
    selected: Option<String>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            selected: None,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// `target` is the identity of the node under the pointer, if any.
    pub fn pointer_down(&mut self, screen: Point, target: Option<&str>) {
        match target {
            Some(identity) => {
                self.state = DragState::Idle;
                self.selected = Some(identity.to_string());
            }
            None => {
                self.state = DragState::Dragging {
                    last: screen,
                    moved: false,
                };
            }
        }
    }

    /// Pans by the distance from the last recorded position.
    pub fn pointer_move(&mut self, screen: Point, viewport: &mut Viewport) {
        if let DragState::Dragging { last, moved } = self.state {
            let delta = screen - last;
            viewport.pan(delta.x, delta.y);
            self.state = DragState::Dragging {
                last: screen,
                moved: moved || delta != Point::default(),
            };
        }
    }

    pub fn pointer_up(&mut self) -> Gesture {
        let gesture = match self.state {
            DragState::Idle => Gesture::None,
            DragState::Dragging { moved: false, .. } => Gesture::BackgroundClick,
            DragState::Dragging { moved: true, .. } => Gesture::DragEnded,
        };
        self.state = DragState::Idle;
        gesture
    }

    /// Selects without touching the drag state. Callers check that the
    /// identity exists.
    pub fn select(&mut self, identity: &str) {
        self.selected = Some(identity.to_string());
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Drops the selection if it no longer names a node of `forest`.
    pub fn retain_in(&mut self, forest: &Forest) {
        if let Some(identity) = &self.selected {
            if !forest.contains_identity(identity) {
                self.selected = None;
            }
        }
    }

    /// Forgets everything; used when the forest is replaced.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
        self.selected = None;
    }

    pub fn detail(&self, forest: &Forest, layout: &Layout) -> Option<NodeDetail> {
        let identity = self.selected.as_deref()?;
        NodeDetail::lookup(forest, layout, identity)
    }
}

/// What the detail panel shows for a selected node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDetail {
    pub identity: String,
    pub label: String,
    pub content: String,
    pub color: &'static str,
    pub children: Vec<String>,
}

impl NodeDetail {
    pub fn lookup(forest: &Forest, layout: &Layout, identity: &str) -> Option<Self> {
        let id = forest.find(identity)?;
        let node = forest.get(id)?;
        let children = forest
            .children(id)
            .into_iter()
            .filter_map(|child| forest.get(child).map(|c| c.label.clone()))
            .collect();

        Some(Self {
            identity: node.identity.clone(),
            label: node.label.clone(),
            content: node.content.clone(),
            color: palette_name(layout.get(id).map(|l| l.color).unwrap_or_default()),
            children,
        })
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
