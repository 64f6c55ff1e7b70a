//! The identified tree: every node of the input annotated with a stable id.
//!
//! Stored as a `StableDiGraph` with parent → child edges plus an id index,
//! the same shape as a scene graph but strictly a tree. The tree is built once
//! per load and never mutated afterwards; view state lives in
//! [`VisibilityState`](crate::visibility::VisibilityState).

use crate::error::LoadError;
use crate::id::{IdAllocator, NodeId};
use crate::model::{Color, DataNode};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::{HashMap, HashSet};

/// One identified node.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: NodeId,
    pub label: String,
    /// Distance from the root (root = 0).
    pub depth: usize,
    /// Parsed `color` hint, if it was a valid hex color.
    pub color: Option<Color>,
}

#[derive(Debug, Clone)]
pub struct MindTree {
    pub graph: StableDiGraph<TreeNode, ()>,
    pub root: NodeIndex,
    id_index: HashMap<NodeId, NodeIndex>,
}

/// Assign an id to every node of `root`.
///
/// Supplied ids are kept; missing ones come from an [`IdAllocator`] scoped to
/// this call that skips every supplied id. `DataNode` owns its children, so a
/// deserialized input is always a tree: cycles and shared subtrees cannot be
/// expressed and are not checked for.
///
/// # Errors
/// [`LoadError::MissingRootLabel`] for a blank root label,
/// [`LoadError::DuplicateId`] when an explicit id appears twice.
pub fn assign_identities(root: &DataNode) -> Result<MindTree, LoadError> {
    if root.name.trim().is_empty() {
        return Err(LoadError::MissingRootLabel);
    }

    let mut supplied = HashSet::new();
    collect_supplied_ids(root, &mut supplied)?;
    let mut ids = IdAllocator::with_reserved(supplied);

    let mut graph = StableDiGraph::with_capacity(root.count(), root.count());
    let mut id_index = HashMap::new();
    let root_idx = insert_subtree(&mut graph, &mut id_index, &mut ids, root, None, 0);

    log::debug!(
        "mind tree loaded: {} nodes under {:?}",
        graph.node_count(),
        root.name
    );

    Ok(MindTree {
        graph,
        root: root_idx,
        id_index,
    })
}

fn collect_supplied_ids(node: &DataNode, seen: &mut HashSet<String>) -> Result<(), LoadError> {
    if let Some(id) = &node.id
        && !seen.insert(id.clone())
    {
        return Err(LoadError::DuplicateId(id.clone()));
    }
    for child in node.children() {
        collect_supplied_ids(child, seen)?;
    }
    Ok(())
}

fn insert_subtree(
    graph: &mut StableDiGraph<TreeNode, ()>,
    id_index: &mut HashMap<NodeId, NodeIndex>,
    ids: &mut IdAllocator,
    data: &DataNode,
    parent: Option<NodeIndex>,
    depth: usize,
) -> NodeIndex {
    let id = match &data.id {
        Some(s) => NodeId::intern(s),
        None => ids.allocate(),
    };
    let node = TreeNode {
        id,
        label: data.name.clone(),
        depth,
        color: data.color.as_deref().and_then(Color::from_hex),
    };
    let idx = graph.add_node(node);
    id_index.insert(id, idx);
    if let Some(p) = parent {
        graph.add_edge(p, idx, ());
    }
    for child in data.children() {
        insert_subtree(graph, id_index, ids, child, Some(idx), depth + 1);
    }
    idx
}

impl MindTree {
    /// Deserialize a JSON tree and assign identities.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let data: DataNode = serde_json::from_str(json)?;
        assign_identities(&data)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn root_id(&self) -> NodeId {
        self.graph[self.root].id
    }

    pub fn root_label(&self) -> &str {
        &self.graph[self.root].label
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    pub fn node(&self, idx: NodeIndex) -> &TreeNode {
        &self.graph[idx]
    }

    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.get(id).map(|n| n.depth)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.label.as_str())
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Children in sibling order.
    ///
    /// Nodes are inserted in preorder, so sorting by `NodeIndex` restores the
    /// input order regardless of petgraph's adjacency iteration order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    pub fn has_children(&self, idx: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .next()
            .is_some()
    }

    /// All node indices in preorder (parent before children, siblings in order).
    pub fn iter_preorder(&self) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            out.push(idx);
            let children = self.children(idx);
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataNode {
        DataNode::branch(
            "Future of AI",
            vec![
                DataNode::branch("Ethics", vec![DataNode::leaf("Bias")]),
                DataNode::leaf("Jobs").with_id("jobs"),
            ],
        )
    }

    #[test]
    fn every_node_gets_an_id() {
        let tree = assign_identities(&sample()).unwrap();
        assert_eq!(tree.len(), 4);
        let ids: HashSet<NodeId> = tree.graph.node_weights().map(|n| n.id).collect();
        assert_eq!(ids.len(), 4);
        assert!(tree.get(NodeId::intern("jobs")).is_some());
    }

    #[test]
    fn synthesized_ids_restart_per_call() {
        let a = assign_identities(&sample()).unwrap();
        let b = assign_identities(&sample()).unwrap();
        assert_eq!(a.root_id(), b.root_id());
        assert_eq!(a.root_id().as_str(), "node_0");
    }

    #[test]
    fn synthesized_ids_avoid_supplied_ones() {
        let data = DataNode::branch("root", vec![DataNode::leaf("x").with_id("node_0")]);
        let tree = assign_identities(&data).unwrap();
        assert_eq!(tree.root_id().as_str(), "node_1");
    }

    #[test]
    fn duplicate_supplied_id_is_rejected() {
        let data = DataNode::branch(
            "root",
            vec![DataNode::leaf("a").with_id("x"), DataNode::leaf("b").with_id("x")],
        );
        assert!(matches!(
            assign_identities(&data),
            Err(LoadError::DuplicateId(id)) if id == "x"
        ));
    }

    #[test]
    fn blank_root_label_is_rejected() {
        assert!(matches!(
            assign_identities(&DataNode::leaf("  ")),
            Err(LoadError::MissingRootLabel)
        ));
    }

    #[test]
    fn children_keep_sibling_order_and_depth() {
        let tree = assign_identities(&sample()).unwrap();
        let labels: Vec<&str> = tree
            .children(tree.root)
            .into_iter()
            .map(|i| tree.node(i).label.as_str())
            .collect();
        assert_eq!(labels, vec!["Ethics", "Jobs"]);
        let preorder: Vec<usize> = tree
            .iter_preorder()
            .into_iter()
            .map(|i| tree.node(i).depth)
            .collect();
        assert_eq!(preorder, vec![0, 1, 2, 1]);
        assert_eq!(tree.depth(NodeId::intern("jobs")), Some(1));
        assert_eq!(tree.label(NodeId::intern("jobs")), Some("Jobs"));
    }

    #[test]
    fn from_json_reports_malformed_input() {
        assert!(matches!(
            MindTree::from_json(r#"{"children": []}"#),
            Err(LoadError::Json(_))
        ));
        assert!(matches!(
            MindTree::from_json(r#"{"name": "a", "children": 3}"#),
            Err(LoadError::Json(_))
        ));
    }
}
