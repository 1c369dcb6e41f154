//! Package graph functionality.
//!
//! Provides utilities for:
//! - The in-memory dependency graph (arena of nodes and named edges)
//! - Loading a graph from an installed `node_modules` tree
//! - Loading a graph from a JSON fixture
//! - Parsing package references (name[@range] or a directory)
//! - Resolving a reference to a single node
//! - Reading `.npmrc` settings

pub mod fixture;
pub mod graph;
pub mod loader;
pub mod lookup;
pub mod npmrc;
pub mod spec;

pub use fixture::{graph_from_value, load_graph_file};
pub use graph::{Edge, NodeId, PackageGraph, PackageNode};
pub use loader::{
    codes as load_codes, load_installed_graph, LoadIssue, LoadOptions, LoadedGraph,
};
pub use lookup::{find_package, find_package_id};
pub use npmrc::{load_npmrc_files, parse_npmrc, NpmrcConfig};
pub use spec::PackageRef;
