//! Resolve a package reference to a single node in the graph.

use semver::Version;
use std::path::{Path, PathBuf};

use super::graph::{NodeId, PackageGraph, PackageNode};
use super::spec::PackageRef;
use crate::paths::resolve_dir;

/// Find the package a user reference points at.
///
/// Directory references match the root's path first, then any installed
/// node at that path. Name references match every node with that name and a
/// valid semver version; the highest version wins, and equal versions fall
/// back to the earliest node in the inventory.
#[must_use]
pub fn find_package<'g>(graph: &'g PackageGraph, spec: &str, cwd: &Path) -> Option<&'g PackageNode> {
    find_package_id(graph, spec, cwd).and_then(|id| graph.get(id))
}

/// Same as [`find_package`], returning the node id.
#[must_use]
pub fn find_package_id(graph: &PackageGraph, spec: &str, cwd: &Path) -> Option<NodeId> {
    match PackageRef::parse(spec) {
        PackageRef::Directory(dir) => {
            let target = resolve_dir(cwd, &expand_home(dir));
            graph.find_by_path(&target).or_else(|| {
                // Graph paths may not be canonical (e.g. loaded from a fixture)
                graph
                    .inventory()
                    .find(|(_, n)| {
                        n.path
                            .as_deref()
                            .is_some_and(|p| resolve_dir(cwd, p) == target)
                    })
                    .map(|(id, _)| id)
            })
        }
        PackageRef::Name { name, .. } => highest_version(graph, &name),
    }
}

fn highest_version(graph: &PackageGraph, name: &str) -> Option<NodeId> {
    graph
        .inventory()
        .filter(|(_, n)| n.name.as_deref() == Some(name))
        .filter_map(|(id, n)| {
            let version = Version::parse(n.version.as_deref()?).ok()?;
            Some((id, version))
        })
        // max_by keeps the last maximum; compare ids in reverse so the first wins
        .max_by(|(a_id, a), (b_id, b)| a.cmp(b).then_with(|| b_id.cmp(a_id)))
        .map(|(id, _)| id)
}

fn expand_home(dir: PathBuf) -> PathBuf {
    if let Ok(rest) = dir.strip_prefix("~") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    dir
}
