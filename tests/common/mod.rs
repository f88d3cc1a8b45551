use concept_canvas::{ConceptNode, Forest, Layout, NodeId};
use proptest::prelude::*;
use proptest::sample::Index;

/// Root "A" with leaf children "B" and "C".
#[allow(dead_code)]
pub fn create_test_forest() -> (Forest, NodeId, NodeId, NodeId) {
    let mut forest = Forest::new();
    let a = forest.add_root(ConceptNode::new("A", "Root").with_content("Main topic"));
    let b = forest.add_child(a, ConceptNode::new("B", "Child 1"));
    let c = forest.add_child(a, ConceptNode::new("C", "Child 2"));
    (forest, a, b, c)
}

#[allow(dead_code)]
pub const SAMPLE_JSON: &str = r#"```json
[
  {
    "id": "rust",
    "label": "Rust",
    "content": "Systems language",
    "children": [
      {"id": "own", "label": "Ownership", "children": [
        {"id": "borrow", "label": "Borrowing"},
        {"id": "life", "label": "Lifetimes"}
      ]},
      {"id": "traits", "label": "Traits"}
    ]
  },
  {"id": "tools", "label": "Tooling"}
]
```"#;

/// Builds a forest from a parent table: entry `i` is either a new root or
/// a child of some earlier node.
#[allow(dead_code)]
pub fn forest_from_shape(shape: &[(bool, Index)]) -> Forest {
    let mut forest = Forest::new();
    let mut ids: Vec<NodeId> = Vec::with_capacity(shape.len());

    for (i, (is_root, parent)) in shape.iter().enumerate() {
        let node = ConceptNode::new(format!("n{i}"), format!("Node {i}"));
        let id = if i == 0 || *is_root {
            forest.add_root(node)
        } else {
            forest.add_child(ids[parent.index(i)], node)
        };
        ids.push(id);
    }

    forest
}

/// Random forests of up to 40 nodes, biased toward few roots.
#[allow(dead_code)]
pub fn arb_forest() -> impl Strategy<Value = Forest> {
    prop::collection::vec((prop::bool::weighted(0.15), any::<Index>()), 0..40)
        .prop_map(|shape| forest_from_shape(&shape))
}

/// Sibling groups of the forest, roots first.
#[allow(dead_code)]
pub fn sibling_groups(forest: &Forest) -> Vec<Vec<NodeId>> {
    let mut groups = vec![forest.roots().to_vec()];
    groups.extend(forest.iter().map(|id| forest.children(id)));
    groups.retain(|g| !g.is_empty());
    groups
}

#[allow(dead_code)]
pub fn y_of(layout: &Layout, id: NodeId) -> f64 {
    layout.get(id).unwrap().y
}
