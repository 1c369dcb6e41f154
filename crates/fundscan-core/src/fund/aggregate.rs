//! Funding aggregation over a package graph.
//!
//! Walks the graph breadth-first from the root and keeps only packages that
//! declare at least one valid funding entry. Unfunded packages never appear
//! in the output; their funded descendants are hoisted to the nearest
//! funded ancestor (or the root).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};

use super::funding::{valid_entries, Funding};
use crate::pkg::graph::{NodeId, PackageGraph, PackageNode};

/// A funded package in the aggregated tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingTreeNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding: Option<Funding>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, FundingTreeNode>,
}

/// Aggregation result: the root package plus its funded dependency tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingSummary {
    /// Root package name, falling back to its path; `null` when neither exists.
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding: Option<Funding>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, FundingTreeNode>,
    /// Number of distinct funded `(name, version)` identities.
    pub length: usize,
}

/// Options for aggregation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FundOptions {
    /// Only compute `length`; `dependencies` stays empty.
    pub count_only: bool,
}

/// Arena slot for a retained package while the tree is being built.
#[derive(Debug, Default)]
struct Retained {
    version: Option<String>,
    funding: Option<Funding>,
    children: BTreeMap<String, usize>,
}

const ROOT_SLOT: usize = 0;

/// Aggregate funding information for every package reachable from the root.
///
/// Each `(name, version)` identity is visited once, so diamonds are counted
/// once and cycles terminate. When two different packages collapse onto the
/// same key under one retained ancestor, the one reached first keeps the
/// slot; the other still counts toward `length` and its funded descendants
/// are hoisted past it.
#[must_use]
pub fn aggregate(graph: &PackageGraph, opts: &FundOptions) -> FundingSummary {
    let Some((root_id, root)) = graph.root().and_then(|id| graph.get(id).map(|n| (id, n))) else {
        return FundingSummary::default();
    };

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(root.identity());

    let root_funding = Funding::from_entries(valid_entries(root.funding.as_ref()));
    let mut length = usize::from(root_funding.is_some());

    let mut arena = vec![Retained::default()];
    let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();
    queue.push_back((root_id, ROOT_SLOT));

    while let Some((id, anchor)) = queue.pop_front() {
        let Some(node) = graph.get(id) else {
            continue;
        };

        for edge in &node.edges {
            let Some((to, child)) = edge.to.and_then(|to| graph.get(to).map(|n| (to, n))) else {
                continue;
            };
            if !seen.insert(child.identity()) {
                continue;
            }

            let mut child_anchor = anchor;
            if let Some(funding) = Funding::from_entries(valid_entries(child.funding.as_ref())) {
                length += 1;
                if !opts.count_only && !arena[anchor].children.contains_key(&edge.name) {
                    let slot = arena.len();
                    arena.push(Retained {
                        version: child.version.clone(),
                        funding: Some(funding),
                        children: BTreeMap::new(),
                    });
                    arena[anchor].children.insert(edge.name.clone(), slot);
                    child_anchor = slot;
                }
            }

            queue.push_back((to, child_anchor));
        }
    }

    FundingSummary {
        name: root_label(root),
        version: root.version.clone(),
        funding: root_funding,
        dependencies: materialize(&arena, ROOT_SLOT),
        length,
    }
}

/// Count funded packages without building the tree.
#[must_use]
pub fn count_funded(graph: &PackageGraph) -> usize {
    aggregate(graph, &FundOptions { count_only: true }).length
}

fn root_label(root: &PackageNode) -> Option<String> {
    root.name
        .clone()
        .or_else(|| root.path.as_ref().map(|p| p.display().to_string()))
}

fn materialize(arena: &[Retained], slot: usize) -> BTreeMap<String, FundingTreeNode> {
    arena[slot]
        .children
        .iter()
        .map(|(key, &child)| {
            let retained = &arena[child];
            let node = FundingTreeNode {
                version: retained.version.clone(),
                funding: retained.funding.clone(),
                dependencies: materialize(arena, child),
            };
            (key.clone(), node)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fund::funding::FundingEntry;
    use crate::pkg::fixture::graph_from_value;
    use crate::pkg::graph::PackageNode;
    use serde_json::{json, Value};

    fn aggregate_json(graph: &Value) -> Value {
        let summary = aggregate(&graph_from_value(graph), &FundOptions::default());
        serde_json::to_value(summary).unwrap()
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(
            aggregate_json(&json!({})),
            json!({ "name": null, "dependencies": {}, "length": 0 })
        );
    }

    #[test]
    fn test_no_root_graph() {
        let summary = aggregate(&PackageGraph::new(), &FundOptions::default());
        assert_eq!(summary, FundingSummary::default());
    }

    #[test]
    fn test_name_falls_back_to_path() {
        let out = aggregate_json(&json!({ "path": "/work/project" }));
        assert_eq!(out["name"], json!("/work/project"));
    }

    #[test]
    fn test_single_funded_dependency() {
        let out = aggregate_json(&json!({
            "name": "project",
            "edgesOut": {
                "single-item": { "to": {
                    "name": "single-item",
                    "version": "1.0.0",
                    "funding": { "type": "foo", "url": "http://example.com" }
                } }
            }
        }));

        assert_eq!(
            out,
            json!({
                "name": "project",
                "dependencies": {
                    "single-item": {
                        "version": "1.0.0",
                        "funding": { "type": "foo", "url": "http://example.com" }
                    }
                },
                "length": 1
            })
        );
    }

    #[test]
    fn test_dependencies_form_matches_edges_out_form() {
        let via_deps = aggregate_json(&json!({
            "name": "project",
            "dependencies": {
                "a": { "name": "a", "version": "1.0.0", "funding": "http://a" }
            }
        }));
        let via_edges = aggregate_json(&json!({
            "name": "project",
            "edgesOut": {
                "a": { "to": { "name": "a", "version": "1.0.0", "funding": "http://a" } }
            }
        }));
        assert_eq!(via_deps, via_edges);
    }

    #[test]
    fn test_chain_collapses_onto_root() {
        let out = aggregate_json(&json!({
            "name": "project",
            "dependencies": {
                "a": { "name": "a", "version": "1.0.0", "dependencies": {
                    "b": { "name": "b", "version": "1.0.0", "dependencies": {
                        "leaf": { "name": "leaf", "version": "1.0.0", "funding": "http://leaf" }
                    } }
                } }
            }
        }));

        assert_eq!(
            out["dependencies"],
            json!({ "leaf": { "version": "1.0.0", "funding": { "url": "http://leaf" } } })
        );
        assert_eq!(out["length"], json!(1));
    }

    #[test]
    fn test_collapse_under_nearest_funded_ancestor() {
        let out = aggregate_json(&json!({
            "name": "project",
            "dependencies": {
                "top": { "name": "top", "version": "1.0.0", "funding": "http://top", "dependencies": {
                    "mid": { "name": "mid", "version": "1.0.0", "dependencies": {
                        "leaf": { "name": "leaf", "version": "2.0.0", "funding": "http://leaf" }
                    } }
                } },
                "plain": { "name": "plain", "version": "1.0.0" }
            }
        }));

        assert_eq!(
            out["dependencies"],
            json!({
                "top": {
                    "version": "1.0.0",
                    "funding": { "url": "http://top" },
                    "dependencies": {
                        "leaf": { "version": "2.0.0", "funding": { "url": "http://leaf" } }
                    }
                }
            })
        );
        assert_eq!(out["length"], json!(2));
    }

    #[test]
    fn test_diamond_versions_are_distinct() {
        let out = aggregate_json(&json!({
            "name": "project",
            "dependencies": {
                "a": { "name": "a", "version": "1.0.0", "funding": "http://a", "dependencies": {
                    "foo": { "name": "foo", "version": "1.0.0", "funding": "http://foo" }
                } },
                "b": { "name": "b", "version": "1.0.0", "funding": "http://b", "dependencies": {
                    "foo": { "name": "foo", "version": "2.0.0", "funding": "http://foo" }
                } }
            }
        }));

        assert_eq!(out["length"], json!(4));
        assert_eq!(out["dependencies"]["a"]["dependencies"]["foo"]["version"], json!("1.0.0"));
        assert_eq!(out["dependencies"]["b"]["dependencies"]["foo"]["version"], json!("2.0.0"));
    }

    #[test]
    fn test_diamond_same_identity_counted_once() {
        let shared = json!({ "name": "shared", "version": "1.0.0", "funding": "http://shared" });
        let out = aggregate_json(&json!({
            "name": "project",
            "dependencies": {
                "a": { "name": "a", "version": "1.0.0", "funding": "http://a", "dependencies": { "shared": shared } },
                "b": { "name": "b", "version": "1.0.0", "funding": "http://b", "dependencies": { "shared": shared } }
            }
        }));

        assert_eq!(out["length"], json!(3));
        assert!(out["dependencies"]["a"]["dependencies"].get("shared").is_some());
        assert!(out["dependencies"]["b"].get("dependencies").is_none());
    }

    #[test]
    fn test_shallowest_occurrence_wins() {
        let out = aggregate_json(&json!({
            "name": "project",
            "dependencies": {
                "a": { "name": "a", "version": "1.0.0", "funding": "http://a", "dependencies": {
                    "x": { "name": "x", "version": "1.0.0", "funding": "http://x" }
                } },
                "x": { "name": "x", "version": "1.0.0", "funding": "http://x" }
            }
        }));

        assert!(out["dependencies"].get("x").is_some());
        assert!(out["dependencies"]["a"].get("dependencies").is_none());
        assert_eq!(out["length"], json!(2));
    }

    #[test]
    fn test_key_collision_first_wins_and_still_counts() {
        let out = aggregate_json(&json!({
            "name": "project",
            "dependencies": {
                "a": { "name": "a", "version": "1.0.0", "dependencies": {
                    "foo": { "name": "foo", "version": "1.0.0", "funding": "http://foo" }
                } },
                "b": { "name": "b", "version": "1.0.0", "dependencies": {
                    "foo": { "name": "foo", "version": "2.0.0", "funding": "http://foo", "dependencies": {
                        "bar": { "name": "bar", "version": "1.0.0", "funding": "http://bar" }
                    } }
                } }
            }
        }));

        assert_eq!(out["length"], json!(3));
        assert_eq!(out["dependencies"]["foo"]["version"], json!("1.0.0"));
        assert_eq!(out["dependencies"]["bar"]["version"], json!("1.0.0"));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = PackageGraph::new();
        let root = graph.add_node(PackageNode::new("project", "1.0.0"));
        let a = graph.add_node(PackageNode::new("a", "1.0.0").with_funding(json!("http://a")));
        let b = graph.add_node(PackageNode::new("b", "1.0.0").with_funding(json!("http://b")));
        graph.add_edge(root, "a", Some(a));
        graph.add_edge(a, "b", Some(b));
        graph.add_edge(b, "a", Some(a));
        graph.add_edge(b, "project", Some(root));
        graph.set_root(root);

        let summary = aggregate(&graph, &FundOptions::default());
        assert_eq!(summary.length, 2);
        assert_eq!(summary.version.as_deref(), Some("1.0.0"));
        let a_node = &summary.dependencies["a"];
        assert!(a_node.dependencies["b"].dependencies.is_empty());
    }

    #[test]
    fn test_root_funding_reported_and_counted() {
        let out = aggregate_json(&json!({
            "name": "project",
            "version": "1.0.0",
            "funding": ["http://root", { "type": "patreon", "url": "http://root-2" }]
        }));

        assert_eq!(
            out,
            json!({
                "name": "project",
                "version": "1.0.0",
                "funding": [
                    { "url": "http://root" },
                    { "type": "patreon", "url": "http://root-2" }
                ],
                "dependencies": {},
                "length": 1
            })
        );
    }

    #[test]
    fn test_invalid_funding_is_pruned() {
        let out = aggregate_json(&json!({
            "name": "project",
            "dependencies": {
                "a": { "name": "a", "version": "1.0.0", "funding": { "type": "no-url" } },
                "b": { "name": "b", "version": "1.0.0", "funding": ["", { "url": "" }] },
                "c": { "name": "c", "version": "1.0.0", "funding": [{ "type": "x" }, "http://c"] }
            }
        }));

        assert_eq!(
            out["dependencies"],
            json!({ "c": { "version": "1.0.0", "funding": { "url": "http://c" } } })
        );
        assert_eq!(out["length"], json!(1));
    }

    #[test]
    fn test_count_only_matches_full() {
        let graph = graph_from_value(&json!({
            "name": "project",
            "funding": "http://root",
            "dependencies": {
                "a": { "name": "a", "version": "1.0.0", "dependencies": {
                    "b": { "name": "b", "version": "1.0.0", "funding": "http://b" }
                } },
                "c": { "name": "c", "version": "1.0.0", "funding": "http://c" }
            }
        }));

        let full = aggregate(&graph, &FundOptions::default());
        let counted = aggregate(&graph, &FundOptions { count_only: true });

        assert_eq!(full.length, 3);
        assert_eq!(counted.length, full.length);
        assert!(counted.dependencies.is_empty());
        assert_eq!(count_funded(&graph), 3);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let graph = graph_from_value(&json!({
            "name": "project",
            "dependencies": {
                "a": { "name": "a", "version": "1.0.0", "funding": "http://a" },
                "b": { "name": "b", "version": "1.0.0", "funding": "http://b" }
            }
        }));

        let first = aggregate(&graph, &FundOptions::default());
        let second = aggregate(&graph, &FundOptions::default());
        assert_eq!(first, second);
        assert_eq!(
            first.dependencies["a"].funding,
            Some(Funding::One(FundingEntry::new("http://a")))
        );
    }

    #[test]
    fn test_unresolved_edges_skipped() {
        let out = aggregate_json(&json!({
            "name": "project",
            "edgesOut": { "ghost": { "to": null } },
            "dependencies": { "range-only": "^1.0.0" }
        }));
        assert_eq!(out["dependencies"], json!({}));
        assert_eq!(out["length"], json!(0));
    }
}
