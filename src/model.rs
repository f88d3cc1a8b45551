use indextree::{Arena, NodeId as TreeNodeId};
use std::collections::HashSet;

use crate::errors::StructuralError;

pub type NodeId = TreeNodeId;

/// Content carried by one node of the concept tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptNode {
    pub identity: String,
    pub label: String,
    pub content: String,
}

impl ConceptNode {
    pub fn new(identity: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            label: label.into(),
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// An ordered collection of independent trees sharing one arena.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub tree: Arena<ConceptNode>,
    roots: Vec<NodeId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, node: ConceptNode) -> NodeId {
        let id = self.tree.new_node(node);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, node: ConceptNode) -> NodeId {
        let id = self.tree.new_node(node);
        parent.append(id, &mut self.tree);
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes reachable from the roots.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn get(&self, id: NodeId) -> Option<&ConceptNode> {
        self.tree.get(id).map(|n| n.get())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.tree).collect()
    }

    /// Pre-order walk over every tree, roots in order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots
            .iter()
            .flat_map(move |root| root.descendants(&self.tree))
    }

    pub fn find(&self, identity: &str) -> Option<NodeId> {
        self.iter()
            .find(|id| self.get(*id).is_some_and(|n| n.identity == identity))
    }

    pub fn contains_identity(&self, identity: &str) -> bool {
        self.find(identity).is_some()
    }

    /// Checks once, at load time, that every identity is unique.
    pub fn validate(&self) -> Result<(), StructuralError> {
        let mut seen = HashSet::new();
        for id in self.iter() {
            if let Some(node) = self.get(id) {
                if !seen.insert(node.identity.as_str()) {
                    return Err(StructuralError::DuplicateIdentity(node.identity.clone()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_forest() -> Forest {
        let mut forest = Forest::new();
        let a = forest.add_root(ConceptNode::new("A", "Root A"));
        forest.add_child(a, ConceptNode::new("B", "Child B").with_content("details"));
        forest.add_child(a, ConceptNode::new("C", "Child C"));
        forest.add_root(ConceptNode::new("D", "Root D"));
        forest
    }

    #[test]
    fn test_node_creation() {
        let node = ConceptNode::new("n1", "Label").with_content("Body");
        assert_eq!(node.identity, "n1");
        assert_eq!(node.label, "Label");
        assert_eq!(node.content, "Body");
    }

    #[test]
    fn test_preorder_iteration() {
        let forest = sample_forest();
        let order: Vec<_> = forest
            .iter()
            .map(|id| forest.get(id).unwrap().identity.clone())
            .collect();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
        assert_eq!(forest.len(), 4);
        assert_eq!(forest.roots().len(), 2);
    }

    #[test]
    fn test_find_by_identity() {
        let forest = sample_forest();
        let b = forest.find("B").expect("B should exist");
        assert_eq!(forest.get(b).unwrap().content, "details");
        assert!(forest.find("missing").is_none());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let mut forest = sample_forest();
        forest.add_root(ConceptNode::new("B", "Another B"));
        assert_eq!(
            forest.validate(),
            Err(StructuralError::DuplicateIdentity("B".to_string()))
        );
    }

    #[test]
    fn test_empty_forest() {
        let forest = Forest::new();
        assert!(forest.is_empty());
        assert_eq!(forest.len(), 0);
        assert!(forest.validate().is_ok());
    }
}
