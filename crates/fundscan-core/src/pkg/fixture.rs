//! JSON graph documents.
//!
//! Accepts the shape an external resolver typically dumps:
//!
//! ```json
//! {
//!   "name": "project",
//!   "version": "1.0.0",
//!   "path": "/work/project",
//!   "package": { "funding": "https://example.com/fund" },
//!   "edgesOut": { "a": { "to": { "name": "a", "version": "1.0.0" } } },
//!   "dependencies": { "b": { "name": "b", "version": "2.0.0" } }
//! }
//! ```
//!
//! `package.name`/`package.version`/`package.funding` take precedence over
//! the node's own fields. Edges may come from `edgesOut` (`{ "to": node }`)
//! or from `dependencies` (node directly); `edgesOut` wins on duplicate
//! names. A dependency whose value is not an object is kept as an
//! unresolved edge.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::graph::{NodeId, PackageGraph, PackageNode};
use crate::error::FundError;

/// Build a graph from a JSON document.
///
/// Anything that is not an object yields a graph without a root.
#[must_use]
pub fn graph_from_value(value: &Value) -> PackageGraph {
    let mut graph = PackageGraph::new();
    if let Some(obj) = value.as_object() {
        let root = add_node(&mut graph, obj);
        graph.set_root(root);
    }
    graph
}

/// Read and parse a JSON graph document from disk.
pub fn load_graph_file(path: &Path) -> Result<PackageGraph, FundError> {
    let content = fs::read_to_string(path).map_err(|source| FundError::GraphRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| FundError::GraphParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(graph_from_value(&value))
}

fn add_node(graph: &mut PackageGraph, obj: &Map<String, Value>) -> NodeId {
    let package = obj.get("package").and_then(Value::as_object);
    let field = |key: &str| {
        package
            .and_then(|p| p.get(key))
            .or_else(|| obj.get(key))
            .filter(|v| !v.is_null())
    };

    let node = PackageNode {
        name: field("name").and_then(Value::as_str).map(String::from),
        version: field("version").and_then(Value::as_str).map(String::from),
        path: obj.get("path").and_then(Value::as_str).map(PathBuf::from),
        funding: field("funding").cloned(),
        edges: Vec::new(),
    };
    let id = graph.add_node(node);

    let mut seen: HashSet<&str> = HashSet::new();

    if let Some(edges) = obj.get("edgesOut").and_then(Value::as_object) {
        for (name, edge) in edges {
            let to = edge
                .get("to")
                .and_then(Value::as_object)
                .map(|target| add_node(graph, target));
            graph.add_edge(id, name.as_str(), to);
            seen.insert(name);
        }
    }

    if let Some(deps) = obj.get("dependencies").and_then(Value::as_object) {
        for (name, dep) in deps {
            if seen.contains(name.as_str()) {
                continue;
            }
            let to = dep.as_object().map(|target| add_node(graph, target));
            graph.add_edge(id, name.as_str(), to);
        }
    }

    id
}
