use crate::config::AppConfig;
use crate::errors::{CanvasResult, RouteError, StructuralError};
use crate::export::CanvasSnapshot;
use crate::geometry::{Point, Rect};
use crate::layout::{CardGeometry, Layout, LayoutParams};
use crate::model::{Forest, NodeId};
use crate::routing::{route_forest, route_visible, ConnectorStyle, Edge};
use crate::selection::{Gesture, NodeDetail, SelectionController};
use crate::viewport::{wheel_direction, Viewport, ViewportLimits};
use tracing::{debug, info, warn};

/// Owns the forest and the four engine components, and keeps them consistent
/// across forest replacements.
#[derive(Debug, Clone)]
pub struct ConceptCanvas {
    forest: Forest,
    layout: Layout,
    pub viewport: Viewport,
    selection: SelectionController,
    style: ConnectorStyle,
    params: LayoutParams,
    card: CardGeometry,
}

impl Default for ConceptCanvas {
    fn default() -> Self {
        Self::new(
            LayoutParams::default(),
            CardGeometry::default(),
            ViewportLimits::default(),
        )
    }
}

impl ConceptCanvas {
    pub fn new(params: LayoutParams, card: CardGeometry, limits: ViewportLimits) -> Self {
        Self {
            forest: Forest::new(),
            layout: Layout {
                params,
                ..Layout::default()
            },
            viewport: Viewport::new(limits),
            selection: SelectionController::new(),
            style: ConnectorStyle::default(),
            params,
            card,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mut canvas = Self::new(
            config.layout_params(),
            config.card(),
            config.viewport_limits(),
        );
        canvas.style = config.connector_style;
        canvas
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn card(&self) -> &CardGeometry {
        &self.card
    }

    pub fn style(&self) -> ConnectorStyle {
        self.style
    }

    /// Swaps in a new forest: validate, lay out once, reset the view and
    /// drop the selection. On error the current state is kept.
    pub fn replace_forest(&mut self, forest: Forest) -> Result<(), StructuralError> {
        let layout = forest
            .validate()
            .and_then(|_| Layout::calculate(&forest, self.params))
            .inspect_err(|e| warn!(error = %e, "rejected forest"))?;

        info!(
            nodes = layout.len(),
            roots = forest.roots().len(),
            "forest replaced"
        );

        self.forest = forest;
        self.layout = layout;
        self.viewport.reset();
        self.selection.reset();
        Ok(())
    }

    /// Changing the style only changes the paths; layout is untouched.
    pub fn set_style(&mut self, style: ConnectorStyle) {
        debug!(%style, "connector style changed");
        self.style = style;
    }

    pub fn set_style_tag(&mut self, tag: &str) -> Result<(), RouteError> {
        self.set_style(tag.parse()?);
        Ok(())
    }

    pub fn cycle_style(&mut self) -> ConnectorStyle {
        self.set_style(self.style.next());
        self.style
    }

    pub fn edges(&self) -> Vec<Edge> {
        route_forest(&self.forest, &self.layout, self.style, &self.card)
    }

    /// Routes only the edges that can show up inside `world`.
    pub fn visible_edges(&self, world: &Rect) -> Vec<Edge> {
        route_visible(&self.forest, &self.layout, self.style, &self.card, world)
    }

    /// Node whose card lies under a screen-space point.
    pub fn hit_test(&self, screen: Point) -> Option<NodeId> {
        let world = self.viewport.screen_to_world(screen);
        self.layout.node_at(world, &self.card)
    }

    pub fn pointer_down(&mut self, screen: Point) {
        let target = self
            .hit_test(screen)
            .and_then(|id| self.forest.get(id))
            .map(|node| node.identity.clone());
        self.selection.pointer_down(screen, target.as_deref());
    }

    pub fn pointer_move(&mut self, screen: Point) {
        self.selection.pointer_move(screen, &mut self.viewport);
    }

    /// Ends the gesture; a click on empty background clears the selection.
    pub fn pointer_up(&mut self) -> Gesture {
        let gesture = self.selection.pointer_up();
        if gesture == Gesture::BackgroundClick {
            self.selection.clear_selection();
        }
        gesture
    }

    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        self.viewport.zoom_at(screen, wheel_direction(delta_y));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Selects a node by identity. Unknown identities leave the selection
    /// unchanged and return false.
    pub fn select(&mut self, identity: &str) -> bool {
        if !self.forest.contains_identity(identity) {
            debug!(identity, "ignoring selection of unknown node");
            return false;
        }
        self.selection.select(identity);
        true
    }

    pub fn selected_detail(&self) -> Option<NodeDetail> {
        self.selection.detail(&self.forest, &self.layout)
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot::capture(self)
    }

    /// Re-applies the view part of a snapshot (transform, style and
    /// selection) to the current forest. Node positions always come from
    /// the layout, never from the snapshot.
    pub fn restore_view(&mut self, snapshot: &CanvasSnapshot) {
        self.viewport = Viewport::with_transform(*self.viewport.limits(), snapshot.transform);
        self.style = snapshot.style;
        self.selection.reset();
        if let Some(identity) = snapshot.selected.as_deref() {
            self.select(identity);
        }
    }
}

/// Builds a canvas straight from source text.
pub fn canvas_from_text(config: &AppConfig, text: &str) -> CanvasResult<ConceptCanvas> {
    let mut canvas = ConceptCanvas::from_config(config);
    canvas.replace_forest(crate::source::parse_forest(text)?)?;
    Ok(canvas)
}
