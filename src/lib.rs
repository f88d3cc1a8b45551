pub mod canvas;
pub mod config;
pub mod errors;
pub mod export;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod routing;
pub mod selection;
pub mod source;
pub mod viewport;

// Terminal host
pub mod actions;
pub mod app;
pub mod event;
pub mod logging;
pub mod ui;

// Re-export commonly used types
pub use app::{AppMode, AppState};
pub use canvas::{canvas_from_text, ConceptCanvas};
pub use config::AppConfig;
pub use errors::{CanvasError, CanvasResult, RouteError, StructuralError};
pub use geometry::{Point, Rect};
pub use layout::{CardGeometry, Layout, LayoutNode, LayoutParams};
pub use model::{ConceptNode, Forest, NodeId};
pub use routing::{route, ConnectorPath, ConnectorStyle, PathCommand};
pub use selection::{DragState, Gesture, NodeDetail, SelectionController};
pub use viewport::{Transform, Viewport, ViewportLimits};
