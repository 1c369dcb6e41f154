//! Package graph construction from an installed `node_modules/` tree.
//!
//! Provides read-only scanning: the project `package.json` becomes the
//! root node, and every dependency edge is resolved the way Node does it,
//! by looking in `<dir>/node_modules/<name>` and then in each ancestor
//! directory up to the project root.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use super::graph::{NodeId, PackageGraph, PackageNode};
use crate::error::FundError;

/// Loader issue codes.
pub mod codes {
    pub const LOAD_PACKAGE_JSON_INVALID: &str = "LOAD_PACKAGE_JSON_INVALID";
    pub const LOAD_PACKAGE_JSON_MISSING: &str = "LOAD_PACKAGE_JSON_MISSING";
    pub const LOAD_IO_ERROR: &str = "LOAD_IO_ERROR";
}

/// A non-fatal problem found while loading the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadIssue {
    /// Stable issue code.
    pub code: String,
    /// Path where the issue occurred.
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl LoadIssue {
    #[must_use]
    pub fn new(code: &str, path: &Path, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            path: path.to_string_lossy().to_string(),
            message: message.into(),
        }
    }
}

/// Options for graph loading.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Include root devDependencies (default true).
    pub include_dev: bool,
    /// Include optionalDependencies (default true).
    pub include_optional: bool,
    /// Include peerDependencies (default true).
    pub include_peer: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_dev: true,
            include_optional: true,
            include_peer: true,
        }
    }
}

/// A loaded graph together with the issues hit while building it.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: PackageGraph,
    /// Sorted by (code, path).
    pub issues: Vec<LoadIssue>,
}

/// Build a package graph from the project at `project_dir`.
///
/// Only a missing or unreadable root `package.json` is an error; anything
/// wrong further down is recorded as a [`LoadIssue`] and the edge is left
/// unresolved.
pub fn load_installed_graph(
    project_dir: &Path,
    opts: &LoadOptions,
) -> Result<LoadedGraph, FundError> {
    let root_dir = dunce::canonicalize(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
    let root_manifest_path = root_dir.join("package.json");
    if !root_manifest_path.is_file() {
        return Err(FundError::ProjectNotFound {
            start: project_dir.to_path_buf(),
        });
    }

    let mut issues = Vec::new();
    let root_manifest = match read_manifest(&root_manifest_path) {
        Ok(manifest) => manifest,
        Err(issue) => {
            // An unparsable root still yields a root node, just an empty one
            issues.push(issue);
            Value::Null
        }
    };

    let mut graph = PackageGraph::new();
    let mut by_path: HashMap<PathBuf, NodeId> = HashMap::new();

    let root_id = graph.add_node(node_from_manifest(&root_manifest, &root_dir));
    graph.set_root(root_id);
    by_path.insert(root_dir.clone(), root_id);

    let mut queue: VecDeque<(NodeId, PathBuf, Value)> = VecDeque::new();
    queue.push_back((root_id, root_dir.clone(), root_manifest));

    while let Some((id, dir, manifest)) = queue.pop_front() {
        let is_root = id == root_id;

        for dep_name in dependency_names(&manifest, opts, is_root) {
            let target = find_installed(&dir, &root_dir, &dep_name).and_then(|pkg_dir| {
                if let Some(existing) = by_path.get(&pkg_dir) {
                    return Some(*existing);
                }
                match read_manifest(&pkg_dir.join("package.json")) {
                    Ok(dep_manifest) => {
                        let dep_id = graph.add_node(node_from_manifest(&dep_manifest, &pkg_dir));
                        by_path.insert(pkg_dir.clone(), dep_id);
                        queue.push_back((dep_id, pkg_dir, dep_manifest));
                        Some(dep_id)
                    }
                    Err(issue) => {
                        issues.push(issue);
                        None
                    }
                }
            });

            graph.add_edge(id, dep_name, target);
        }
    }

    issues.sort_by(|a, b| (&a.code, &a.path).cmp(&(&b.code, &b.path)));
    issues.dedup();

    Ok(LoadedGraph { graph, issues })
}

fn node_from_manifest(manifest: &Value, dir: &Path) -> PackageNode {
    let text = |key: &str| manifest.get(key).and_then(Value::as_str).map(String::from);

    PackageNode {
        name: text("name"),
        version: text("version"),
        path: Some(dir.to_path_buf()),
        funding: manifest.get("funding").filter(|v| !v.is_null()).cloned(),
        edges: Vec::new(),
    }
}

/// Dependency names declared by a manifest, sorted and deduplicated.
fn dependency_names(manifest: &Value, opts: &LoadOptions, is_root: bool) -> Vec<String> {
    let mut sections = vec!["dependencies"];
    if opts.include_optional {
        sections.push("optionalDependencies");
    }
    if opts.include_peer {
        sections.push("peerDependencies");
    }
    if is_root && opts.include_dev {
        sections.push("devDependencies");
    }

    let mut names: Vec<String> = sections
        .into_iter()
        .filter_map(|section| manifest.get(section).and_then(Value::as_object))
        .flat_map(|obj| obj.keys().cloned())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Locate `name` from `from_dir`, walking up to `root_dir`.
fn find_installed(from_dir: &Path, root_dir: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(from_dir);

    while let Some(dir) = current {
        let candidate = package_dir(&dir.join("node_modules"), name);
        if candidate.is_dir() {
            return Some(dunce::canonicalize(&candidate).unwrap_or(candidate));
        }
        if dir == root_dir {
            break;
        }
        current = dir.parent();
    }

    None
}

fn package_dir(node_modules: &Path, name: &str) -> PathBuf {
    // Scoped names map onto two directory levels
    match name.split_once('/') {
        Some((scope, rest)) if name.starts_with('@') => node_modules.join(scope).join(rest),
        _ => node_modules.join(name),
    }
}

fn read_manifest(path: &Path) -> Result<Value, LoadIssue> {
    if !path.is_file() {
        return Err(LoadIssue::new(
            codes::LOAD_PACKAGE_JSON_MISSING,
            path,
            "package.json not found",
        ));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        LoadIssue::new(codes::LOAD_IO_ERROR, path, format!("Failed to read: {e}"))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        LoadIssue::new(
            codes::LOAD_PACKAGE_JSON_INVALID,
            path,
            format!("Invalid JSON: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn write_package(dir: &Path, manifest: &Value) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("package.json"),
            serde_json::to_string_pretty(manifest).unwrap(),
        )
        .unwrap();
    }

    fn node_named<'g>(graph: &'g PackageGraph, name: &str) -> &'g PackageNode {
        graph
            .inventory()
            .map(|(_, n)| n)
            .find(|n| n.name.as_deref() == Some(name))
            .unwrap()
    }

    #[test]
    fn test_simple_chain() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        write_package(root, &json!({ "name": "proj", "version": "1.0.0", "dependencies": { "a": "^1" } }));
        write_package(
            &root.join("node_modules/a"),
            &json!({ "name": "a", "version": "1.0.0", "dependencies": { "b": "^1" }, "funding": "https://a.dev" }),
        );
        write_package(&root.join("node_modules/b"), &json!({ "name": "b", "version": "1.0.0" }));

        let loaded = load_installed_graph(root, &LoadOptions::default()).unwrap();
        let graph = &loaded.graph;

        assert!(loaded.issues.is_empty());
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.root_node().unwrap().name.as_deref(), Some("proj"));

        let a = node_named(graph, "a");
        assert_eq!(a.funding, Some(json!("https://a.dev")));
        assert_eq!(a.edges.len(), 1);
        assert!(a.edges[0].to.is_some());
    }

    #[test]
    fn test_nested_node_modules_preferred() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        write_package(root, &json!({ "name": "proj", "dependencies": { "a": "1", "b": "2" } }));
        write_package(
            &root.join("node_modules/a"),
            &json!({ "name": "a", "version": "1.0.0", "dependencies": { "b": "1" } }),
        );
        write_package(
            &root.join("node_modules/a/node_modules/b"),
            &json!({ "name": "b", "version": "1.0.0" }),
        );
        write_package(&root.join("node_modules/b"), &json!({ "name": "b", "version": "2.0.0" }));

        let loaded = load_installed_graph(root, &LoadOptions::default()).unwrap();
        let graph = &loaded.graph;

        let a = node_named(graph, "a");
        let nested_b = graph.get(a.edges[0].to.unwrap()).unwrap();
        assert_eq!(nested_b.version.as_deref(), Some("1.0.0"));

        let root_node = graph.root_node().unwrap();
        let hoisted_b = graph.get(root_node.edges[1].to.unwrap()).unwrap();
        assert_eq!(hoisted_b.version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_scoped_package() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        write_package(root, &json!({ "name": "proj", "dependencies": { "@scope/pkg": "1" } }));
        write_package(
            &root.join("node_modules/@scope/pkg"),
            &json!({ "name": "@scope/pkg", "version": "1.0.0" }),
        );

        let loaded = load_installed_graph(root, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.graph.len(), 2);
        assert_eq!(node_named(&loaded.graph, "@scope/pkg").version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_dev_dependencies_only_from_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        write_package(root, &json!({ "name": "proj", "devDependencies": { "tool": "1" } }));
        write_package(
            &root.join("node_modules/tool"),
            &json!({ "name": "tool", "version": "1.0.0", "devDependencies": { "ignored": "1" } }),
        );
        write_package(&root.join("node_modules/ignored"), &json!({ "name": "ignored", "version": "1.0.0" }));

        let loaded = load_installed_graph(root, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.graph.len(), 2);

        let no_dev = LoadOptions {
            include_dev: false,
            ..Default::default()
        };
        let loaded = load_installed_graph(root, &no_dev).unwrap();
        assert_eq!(loaded.graph.len(), 1);
    }

    #[test]
    fn test_shared_install_is_one_node() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        write_package(root, &json!({ "name": "proj", "dependencies": { "a": "1", "b": "1" } }));
        write_package(
            &root.join("node_modules/a"),
            &json!({ "name": "a", "version": "1.0.0", "dependencies": { "shared": "1" } }),
        );
        write_package(
            &root.join("node_modules/b"),
            &json!({ "name": "b", "version": "1.0.0", "dependencies": { "shared": "1" } }),
        );
        write_package(&root.join("node_modules/shared"), &json!({ "name": "shared", "version": "1.0.0" }));

        let loaded = load_installed_graph(root, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.graph.len(), 4);
    }

    #[test]
    fn test_invalid_package_json_is_issue() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        write_package(root, &json!({ "name": "proj", "dependencies": { "a": "1", "gone": "1" } }));
        let a_dir = root.join("node_modules/a");
        fs::create_dir_all(&a_dir).unwrap();
        fs::write(a_dir.join("package.json"), "not valid json {{{").unwrap();

        let loaded = load_installed_graph(root, &LoadOptions::default()).unwrap();
        let root_node = loaded.graph.root_node().unwrap();

        assert_eq!(root_node.edges.len(), 2);
        assert!(root_node.edges.iter().all(|e| e.to.is_none()));
        assert_eq!(loaded.issues.len(), 1);
        assert_eq!(loaded.issues[0].code, codes::LOAD_PACKAGE_JSON_INVALID);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = tempdir().unwrap();
        let err = load_installed_graph(dir.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, FundError::ProjectNotFound { .. }));
    }
}
