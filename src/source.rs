use crate::errors::{CanvasError, CanvasResult};
use crate::model::{ConceptNode, Forest, NodeId};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// A node as delivered by the concept source. Only `label` is mandatory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub content: String,
    pub children: Vec<SourceNode>,
}

const FENCE_PATTERN: &str = r"```(?:json)?";

fn fence_pattern() -> Result<&'static Regex, regex::Error> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    if let Some(pattern) = FENCE.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(FENCE_PATTERN)?;
    Ok(FENCE.get_or_init(|| pattern))
}

/// Deserializes without serde_json's nesting cap; forests can be
/// arbitrarily deep.
fn from_str_unbounded<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

pub fn load_file(path: &Path) -> CanvasResult<Forest> {
    if !path.exists() {
        return Err(CanvasError::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_forest(&content)
}

/// Parses a JSON forest (an array of roots or a single root object),
/// tolerating surrounding markdown code fences.
pub fn parse_forest(text: &str) -> CanvasResult<Forest> {
    let cleaned = fence_pattern()?.replace_all(text, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Ok(Forest::new());
    }

    let roots: Vec<SourceNode> = if cleaned.starts_with('[') {
        from_str_unbounded(cleaned)?
    } else {
        vec![from_str_unbounded(cleaned)?]
    };

    let forest = build_forest(&roots);
    debug!(nodes = forest.len(), roots = forest.roots().len(), "forest parsed");
    Ok(forest)
}

/// Copies source nodes into an arena, giving every node without an id a
/// synthesized `node-<n>` identity that does not clash with supplied ones.
pub fn build_forest(roots: &[SourceNode]) -> Forest {
    let mut taken = HashSet::new();
    collect_ids(roots, &mut taken);

    let mut forest = Forest::new();
    let mut counter = 0usize;

    for root in roots {
        let identity = identity_for(root, &mut counter, &taken);
        let root_id = forest.add_root(concept_from(root, identity));
        append_children(&mut forest, root_id, &root.children, &mut counter, &taken);
    }

    forest
}

fn collect_ids<'a>(nodes: &'a [SourceNode], taken: &mut HashSet<&'a str>) {
    for node in nodes {
        if let Some(id) = node.id.as_deref() {
            taken.insert(id);
        }
        collect_ids(&node.children, taken);
    }
}

fn append_children(
    forest: &mut Forest,
    parent: NodeId,
    children: &[SourceNode],
    counter: &mut usize,
    taken: &HashSet<&str>,
) {
    for child in children {
        let identity = identity_for(child, counter, taken);
        let child_id = forest.add_child(parent, concept_from(child, identity));
        append_children(forest, child_id, &child.children, counter, taken);
    }
}

fn identity_for(node: &SourceNode, counter: &mut usize, taken: &HashSet<&str>) -> String {
    if let Some(id) = node.id.as_deref().filter(|id| !id.trim().is_empty()) {
        return id.to_string();
    }
    loop {
        let candidate = format!("node-{}", *counter);
        *counter += 1;
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
}

fn concept_from(node: &SourceNode, identity: String) -> ConceptNode {
    ConceptNode::new(identity, node.label.clone()).with_content(node.content.clone())
}

/// Turns a forest back into source nodes, ids included.
pub fn to_source(forest: &Forest) -> Vec<SourceNode> {
    fn convert(forest: &Forest, id: NodeId) -> Option<SourceNode> {
        let node = forest.get(id)?;
        Some(SourceNode {
            id: Some(node.identity.clone()),
            label: node.label.clone(),
            content: node.content.clone(),
            children: forest
                .children(id)
                .into_iter()
                .filter_map(|child| convert(forest, child))
                .collect(),
        })
    }

    forest
        .roots()
        .iter()
        .filter_map(|root| convert(forest, *root))
        .collect()
}
