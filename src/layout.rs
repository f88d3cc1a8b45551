use crate::errors::StructuralError;
use crate::geometry::{Point, Rect};
use crate::model::{Forest, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Vertical slot reserved for a leaf
pub const LEAF_SLOT_HEIGHT: f64 = 150.0;

/// Horizontal distance between depth columns
pub const HORIZONTAL_SPACING: f64 = 350.0;

/// Depth colors, indexed by `depth % PALETTE.len()`
pub const PALETTE: [&str; 5] = ["primary", "secondary", "accent", "purple", "pink"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub leaf_slot_height: f64,
    pub horizontal_spacing: f64,
    pub palette_size: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            leaf_slot_height: LEAF_SLOT_HEIGHT,
            horizontal_spacing: HORIZONTAL_SPACING,
            palette_size: PALETTE.len(),
        }
    }
}

/// Size of a node card and the vertical offset of its ports, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardGeometry {
    pub width: f64,
    pub height: f64,
    pub port_offset: f64,
}

impl Default for CardGeometry {
    fn default() -> Self {
        Self {
            width: 280.0,
            height: 110.0,
            port_offset: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    /// Palette index
    pub color: usize,
    /// Vertical cursor where this node's slot starts
    pub top: f64,
    pub subtree_height: f64,
}

impl LayoutNode {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn card(&self, card: &CardGeometry) -> Rect {
        Rect::new(self.x, self.y, card.width, card.height)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub nodes: HashMap<NodeId, LayoutNode>,
    /// Pre-order
    pub order: Vec<NodeId>,
    pub params: LayoutParams,
    pub map_width: f64,
    pub map_top: f64,
    pub map_bottom: f64,
    pub total_height: f64,
}

impl Layout {
    /// Lays out every tree of the forest in one pass. Roots are stacked as
    /// siblings of an implicit level starting at y = 0.
    pub fn calculate(forest: &Forest, params: LayoutParams) -> Result<Self, StructuralError> {
        let mut layout = Layout {
            params,
            ..Layout::default()
        };

        let mut path = HashSet::new();
        layout.total_height = layout.place_siblings(forest, forest.roots(), 0, 0.0, &mut path)?;

        debug!(
            nodes = layout.nodes.len(),
            height = layout.total_height,
            "layout computed"
        );
        Ok(layout)
    }

    /// Places `siblings` one below another starting at `start_y` and
    /// returns the vertical span they consumed.
    fn place_siblings(
        &mut self,
        forest: &Forest,
        siblings: &[NodeId],
        depth: usize,
        start_y: f64,
        path: &mut HashSet<String>,
    ) -> Result<f64, StructuralError> {
        let slot = self.params.leaf_slot_height;
        let x = depth as f64 * self.params.horizontal_spacing;
        let mut cursor = start_y;

        for &node_id in siblings {
            let Some(node) = forest.get(node_id) else {
                continue;
            };

            if !path.insert(node.identity.clone()) {
                return Err(StructuralError::Cycle(node.identity.clone()));
            }

            // Reserve the pre-order position before descending.
            self.order.push(node_id);

            let children = forest.children(node_id);
            let height = if children.is_empty() {
                slot
            } else {
                self.place_siblings(forest, &children, depth + 1, cursor, path)?
            };

            path.remove(&node.identity);

            // Centre against the children block.
            let y = cursor + height / 2.0 - slot / 2.0;

            self.nodes.insert(
                node_id,
                LayoutNode {
                    depth,
                    x,
                    y,
                    color: depth % self.params.palette_size.max(1),
                    top: cursor,
                    subtree_height: height,
                },
            );

            self.map_width = self.map_width.max(x);
            self.map_top = self.map_top.min(y);
            self.map_bottom = self.map_bottom.max(y + slot);

            cursor += height;
        }

        Ok(cursor - start_y)
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// World-space box enclosing every card.
    pub fn bounds(&self, card: &CardGeometry) -> Rect {
        if self.is_empty() {
            return Rect::default();
        }
        let bottom = self
            .nodes
            .values()
            .map(|n| n.y + card.height)
            .fold(self.map_bottom, f64::max);
        Rect::new(
            0.0,
            self.map_top,
            self.map_width + card.width,
            bottom - self.map_top,
        )
    }

    /// Topmost node whose card contains `world`. Later nodes in pre-order
    /// are drawn above earlier ones, so the search runs backwards.
    pub fn node_at(&self, world: Point, card: &CardGeometry) -> Option<NodeId> {
        self.order.iter().rev().copied().find(|id| {
            self.nodes
                .get(id)
                .is_some_and(|layout| layout.card(card).contains(world))
        })
    }

    pub fn visible_nodes(&self, viewport: &Rect, card: &CardGeometry) -> Vec<NodeId> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                self.nodes
                    .get(id)
                    .is_some_and(|layout| layout.card(card).intersects(viewport))
            })
            .collect()
    }
}

pub fn palette_name(color: usize) -> &'static str {
    PALETTE[color % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConceptNode;

    fn create_test_forest() -> (Forest, NodeId, NodeId, NodeId) {
        let mut forest = Forest::new();
        let a = forest.add_root(ConceptNode::new("A", "Root"));
        let b = forest.add_child(a, ConceptNode::new("B", "Child 1"));
        let c = forest.add_child(a, ConceptNode::new("C", "Child 2"));
        (forest, a, b, c)
    }

    #[test]
    fn test_root_with_two_leaves() {
        let (forest, a, b, c) = create_test_forest();
        let layout = Layout::calculate(&forest, LayoutParams::default()).unwrap();

        let a = layout.get(a).unwrap();
        let b = layout.get(b).unwrap();
        let c = layout.get(c).unwrap();

        assert_eq!((a.depth, a.x), (0, 0.0));
        assert_eq!((b.depth, b.x), (1, 350.0));
        assert_eq!((c.depth, c.x), (1, 350.0));
        assert_eq!(b.y, 0.0);
        assert_eq!(c.y, 150.0);
        assert!((b.y - c.y).abs() >= LEAF_SLOT_HEIGHT);
        // Centred on the 300-unit children block.
        assert_eq!(a.y, 75.0);
        assert_eq!(a.subtree_height, 300.0);
    }

    #[test]
    fn test_empty_forest() {
        let layout = Layout::calculate(&Forest::new(), LayoutParams::default()).unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.total_height, 0.0);
        assert_eq!(layout.bounds(&CardGeometry::default()), Rect::default());
    }

    #[test]
    fn test_single_child_matches_general_case() {
        let mut forest = Forest::new();
        let root = forest.add_root(ConceptNode::new("r", "Root"));
        let only = forest.add_child(root, ConceptNode::new("o", "Only"));
        let layout = Layout::calculate(&forest, LayoutParams::default()).unwrap();

        assert_eq!(layout.get(root).unwrap().y, layout.get(only).unwrap().y);
        assert_eq!(layout.get(root).unwrap().subtree_height, LEAF_SLOT_HEIGHT);
    }

    #[test]
    fn test_roots_stack_as_siblings() {
        let (mut forest, a, _, _) = create_test_forest();
        let d = forest.add_root(ConceptNode::new("D", "Second root"));
        let layout = Layout::calculate(&forest, LayoutParams::default()).unwrap();

        let d = layout.get(d).unwrap();
        assert_eq!(d.depth, 0);
        assert_eq!(d.top, layout.get(a).unwrap().subtree_height);
        assert_eq!(layout.total_height, 450.0);
    }

    #[test]
    fn test_colors_cycle_through_palette() {
        let mut forest = Forest::new();
        let mut parent = forest.add_root(ConceptNode::new("n0", "0"));
        let mut ids = vec![parent];
        for depth in 1..7 {
            parent = forest.add_child(parent, ConceptNode::new(format!("n{depth}"), "x"));
            ids.push(parent);
        }
        let layout = Layout::calculate(&forest, LayoutParams::default()).unwrap();

        for (depth, id) in ids.iter().enumerate() {
            assert_eq!(layout.get(*id).unwrap().color, depth % PALETTE.len());
        }
        assert_eq!(palette_name(5), "primary");
    }

    #[test]
    fn test_repeated_identity_on_path_is_rejected() {
        let mut forest = Forest::new();
        let a = forest.add_root(ConceptNode::new("A", "Root"));
        let b = forest.add_child(a, ConceptNode::new("B", "Child"));
        forest.add_child(b, ConceptNode::new("A", "Loop back"));

        let err = Layout::calculate(&forest, LayoutParams::default()).unwrap_err();
        assert_eq!(err, StructuralError::Cycle("A".to_string()));
    }

    #[test]
    fn test_same_identity_in_separate_branches_is_not_a_cycle() {
        let mut forest = Forest::new();
        let a = forest.add_root(ConceptNode::new("A", "Root"));
        forest.add_child(a, ConceptNode::new("X", "Left"));
        forest.add_child(a, ConceptNode::new("X", "Right"));

        assert!(Layout::calculate(&forest, LayoutParams::default()).is_ok());
    }

    #[test]
    fn test_order_is_preorder() {
        let (forest, a, b, c) = create_test_forest();
        let layout = Layout::calculate(&forest, LayoutParams::default()).unwrap();
        assert_eq!(layout.order, vec![a, b, c]);
    }

    #[test]
    fn test_node_at_hits_card() {
        let (forest, a, b, c) = create_test_forest();
        let layout = Layout::calculate(&forest, LayoutParams::default()).unwrap();
        let card = CardGeometry::default();

        assert_eq!(layout.node_at(Point::new(10.0, 80.0), &card), Some(a));
        assert_eq!(layout.node_at(Point::new(360.0, 10.0), &card), Some(b));
        assert_eq!(layout.node_at(Point::new(360.0, 160.0), &card), Some(c));
        assert_eq!(layout.node_at(Point::new(300.0, 10.0), &card), None);
    }

    #[test]
    fn test_visible_nodes_culls_offscreen_cards() {
        let (forest, a, _, _) = create_test_forest();
        let layout = Layout::calculate(&forest, LayoutParams::default()).unwrap();
        let card = CardGeometry::default();

        let visible = layout.visible_nodes(&Rect::new(0.0, 0.0, 300.0, 300.0), &card);
        assert_eq!(visible, vec![a]);
    }

    #[test]
    fn test_custom_spacing() {
        let (forest, _, b, _) = create_test_forest();
        let params = LayoutParams {
            leaf_slot_height: 100.0,
            horizontal_spacing: 200.0,
            ..LayoutParams::default()
        };
        let layout = Layout::calculate(&forest, params).unwrap();
        assert_eq!(layout.get(b).unwrap().x, 200.0);
        assert_eq!(layout.total_height, 200.0);
    }
}
