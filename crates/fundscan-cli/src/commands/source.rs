//! Where the dependency graph comes from.

use fundscan_core::paths::project_root;
use fundscan_core::pkg::{load_graph_file, load_installed_graph, LoadOptions, PackageGraph};
use fundscan_core::FundError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Graph source selected on the command line.
#[derive(Debug, Clone, Default)]
pub struct GraphSource {
    /// JSON graph fixture; when set, `node_modules` is not read.
    pub fixture: Option<PathBuf>,
    pub options: LoadOptions,
}

/// Load the graph for the project containing `cwd`.
pub fn load(cwd: &Path, source: &GraphSource) -> Result<PackageGraph, FundError> {
    if let Some(fixture) = &source.fixture {
        let path = cwd.join(fixture);
        debug!(path = %path.display(), "loading graph fixture");
        return load_graph_file(&path);
    }

    let root = project_root(cwd).ok_or_else(|| FundError::ProjectNotFound {
        start: cwd.to_path_buf(),
    })?;
    debug!(root = %root.display(), "loading installed tree");

    let loaded = load_installed_graph(&root, &source.options)?;
    for issue in &loaded.issues {
        warn!(code = %issue.code, path = %issue.path, "{}", issue.message);
    }
    debug!(
        nodes = loaded.graph.len(),
        issues = loaded.issues.len(),
        "graph loaded"
    );

    Ok(loaded.graph)
}
