//! In-memory package dependency graph.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Edges point at
//! node ids, so diamonds and cycles are representable without shared
//! ownership. The graph is built once by a loader (see [`super::loader`] and
//! [`super::fixture`]) and only read afterwards.

use serde_json::Value;
use std::path::{Path, PathBuf};

/// Index of a node inside a [`PackageGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// An outgoing dependency edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Dependency key as declared by the parent.
    pub name: String,
    /// Resolved target, `None` when the dependency is not installed.
    pub to: Option<NodeId>,
}

/// A package instance in the graph.
#[derive(Debug, Clone, Default)]
pub struct PackageNode {
    /// Declared package name.
    pub name: Option<String>,
    /// Declared package version.
    pub version: Option<String>,
    /// Install location on disk.
    pub path: Option<PathBuf>,
    /// Raw `funding` field, exactly as declared.
    pub funding: Option<Value>,
    /// Outgoing edges in insertion order.
    pub edges: Vec<Edge>,
}

impl PackageNode {
    /// Create a node with a name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            ..Default::default()
        }
    }

    /// Attach a raw funding declaration.
    #[must_use]
    pub fn with_funding(mut self, funding: Value) -> Self {
        self.funding = Some(funding);
        self
    }

    /// Attach an install path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Identity key used for deduplication: `(name, version)`.
    #[must_use]
    pub fn identity(&self) -> String {
        format!(
            "{}@{}",
            self.name.as_deref().unwrap_or_default(),
            self.version.as_deref().unwrap_or_default()
        )
    }
}

/// The complete package graph.
#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    nodes: Vec<PackageNode>,
    root: Option<NodeId>,
}

impl PackageGraph {
    /// Create an empty graph with no root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id.
    pub fn add_node(&mut self, node: PackageNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Add an edge from `from` named `name`.
    ///
    /// # Panics
    /// Panics if `from` does not belong to this graph.
    pub fn add_edge(&mut self, from: NodeId, name: impl Into<String>, to: Option<NodeId>) {
        self.nodes[from.0].edges.push(Edge {
            name: name.into(),
            to,
        });
    }

    /// Mark `id` as the project root.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[must_use]
    pub fn root_node(&self) -> Option<&PackageNode> {
        self.root.and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&PackageNode> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate every node in the graph, reachable or not.
    pub fn inventory(&self) -> impl Iterator<Item = (NodeId, &PackageNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Find the node installed at `path`.
    #[must_use]
    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        if let Some(root) = self.root {
            if self.nodes[root.0].path.as_deref() == Some(path) {
                return Some(root);
            }
        }
        self.inventory()
            .find(|(_, n)| n.path.as_deref() == Some(path))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_key() {
        let node = PackageNode::new("foo", "1.0.0");
        assert_eq!(node.identity(), "foo@1.0.0");

        let unnamed = PackageNode::default();
        assert_eq!(unnamed.identity(), "@");
    }

    #[test]
    fn test_cycle_is_representable() {
        let mut graph = PackageGraph::new();
        let a = graph.add_node(PackageNode::new("a", "1.0.0"));
        let b = graph.add_node(PackageNode::new("b", "1.0.0"));
        graph.add_edge(a, "b", Some(b));
        graph.add_edge(b, "a", Some(a));
        graph.set_root(a);

        assert_eq!(graph.root(), Some(a));
        assert_eq!(graph.get(b).unwrap().edges[0].to, Some(a));
    }

    #[test]
    fn test_find_by_path_prefers_root() {
        let mut graph = PackageGraph::new();
        let other = graph.add_node(PackageNode::new("x", "1.0.0").with_path("/proj"));
        let root = graph.add_node(
            PackageNode::new("proj", "1.0.0")
                .with_path("/proj")
                .with_funding(json!("https://example.com")),
        );
        graph.set_root(root);

        assert_eq!(graph.find_by_path(Path::new("/proj")), Some(root));
        assert_ne!(graph.find_by_path(Path::new("/proj")), Some(other));
        assert_eq!(graph.find_by_path(Path::new("/nope")), None);
    }
}
