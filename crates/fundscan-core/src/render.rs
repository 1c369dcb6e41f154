//! Output rendering for funding summaries.
//!
//! Two modes:
//! - structured: the [`FundingSummary`] as pretty JSON
//! - human: a drawn tree where every funding URL appears once, with all
//!   packages sharing it listed on the same node
//!
//! ```text
//! project@1.0.0
//! ├── https://github.com/sponsors/a
//! │   └── a@1.0.0, c@2.1.0
//! └─┬ https://opencollective.com/b
//!   │ └── b@3.0.0
//!   └── https://example.com/d
//!       └── d@0.1.0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::fund::aggregate::{FundingSummary, FundingTreeNode};
use crate::fund::funding::Funding;

/// Connector set used when drawing trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    #[default]
    Unicode,
    Ascii,
}

struct Glyphs {
    vertical: &'static str,
    branch: &'static str,
    last: &'static str,
    horizontal: &'static str,
    tee: &'static str,
}

impl Charset {
    fn glyphs(self) -> Glyphs {
        match self {
            Self::Unicode => Glyphs {
                vertical: "│",
                branch: "├",
                last: "└",
                horizontal: "─",
                tee: "┬",
            },
            Self::Ascii => Glyphs {
                vertical: "|",
                branch: "+",
                last: "`",
                horizontal: "-",
                tee: "-",
            },
        }
    }
}

/// A node of the drawn tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderNode {
    pub label: String,
    pub nodes: Vec<RenderNode>,
}

impl RenderNode {
    #[must_use]
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            nodes: Vec::new(),
        }
    }
}

/// `name` or `name@version`.
#[must_use]
pub fn package_ref(name: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("{name}@{version}"),
        None => name.to_string(),
    }
}

/// Serialize the summary with 2-space indentation.
pub fn to_json(summary: &FundingSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}

/// Render the summary as a grouped human-readable tree.
#[must_use]
pub fn render_human(summary: &FundingSummary, charset: Charset) -> String {
    let tree = build_render_tree(summary, charset);
    draw(&tree, "", charset).trim_end_matches('\n').to_string()
}

#[derive(Debug)]
struct Slot {
    label: String,
    children: Vec<usize>,
}

/// Build the grouped render tree.
///
/// Traversal is breadth-first, so the first package seen with a given URL is
/// the shallowest one; it owns the visual node and later packages with the
/// same URL are appended to its label. Children of a merged package attach
/// to the scope the merged package would have been placed in.
#[must_use]
pub fn build_render_tree(summary: &FundingSummary, charset: Charset) -> RenderNode {
    let name = summary.name.as_deref().unwrap_or_default();
    let header = package_ref(name, summary.version.as_deref());

    let root_url = first_url(summary.funding.as_ref());
    let mut arena = vec![Slot {
        label: node_label(&header, root_url, charset),
        children: Vec::new(),
    }];
    let mut by_url: HashMap<&str, usize> = HashMap::new();
    if let Some(url) = root_url {
        by_url.insert(url, 0);
    }

    let mut queue: VecDeque<(&BTreeMap<String, FundingTreeNode>, usize)> = VecDeque::new();
    queue.push_back((&summary.dependencies, 0));

    while let Some((deps, scope)) = queue.pop_front() {
        for (dep_name, node) in deps {
            let reference = package_ref(dep_name, node.version.as_deref());
            let url = first_url(node.funding.as_ref());

            let child_scope = if let Some(&existing) = url.and_then(|u| by_url.get(u)) {
                let label = &mut arena[existing].label;
                label.push_str(", ");
                label.push_str(&reference);
                scope
            } else {
                let slot = arena.len();
                arena.push(Slot {
                    label: node_label(&reference, url, charset),
                    children: Vec::new(),
                });
                arena[scope].children.push(slot);
                if let Some(url) = url {
                    by_url.insert(url, slot);
                }
                slot
            };

            if !node.dependencies.is_empty() {
                queue.push_back((&node.dependencies, child_scope));
            }
        }
    }

    let root = assemble(&arena, 0);
    if root.label == header {
        root
    } else {
        RenderNode {
            label: header,
            nodes: vec![root],
        }
    }
}

fn first_url(funding: Option<&Funding>) -> Option<&str> {
    funding
        .and_then(Funding::first)
        .map(|entry| entry.url.as_str())
}

/// URL above the package reference when funded, bare reference otherwise.
fn node_label(reference: &str, url: Option<&str>, charset: Charset) -> String {
    match url {
        Some(url) => {
            let composite = RenderNode {
                label: url.to_string(),
                nodes: vec![RenderNode::leaf(reference)],
            };
            draw(&composite, "", charset).trim().to_string()
        }
        None => reference.to_string(),
    }
}

fn assemble(arena: &[Slot], slot: usize) -> RenderNode {
    RenderNode {
        label: arena[slot].label.clone(),
        nodes: arena[slot]
            .children
            .iter()
            .map(|&child| assemble(arena, child))
            .collect(),
    }
}

/// Draw a tree. Every line starts with `prefix`; multi-line labels are
/// continued under their first line.
#[must_use]
pub fn draw(node: &RenderNode, prefix: &str, charset: Charset) -> String {
    let g = charset.glyphs();

    let continuation = if node.nodes.is_empty() { " " } else { g.vertical };
    let splitter = format!("\n{prefix}{continuation} ");
    let mut out = format!("{prefix}{}\n", node.label.split('\n').collect::<Vec<_>>().join(&splitter));

    let count = node.nodes.len();
    for (ix, child) in node.nodes.iter().enumerate() {
        let last = ix + 1 == count;
        let more = !child.nodes.is_empty();
        let child_prefix = format!("{prefix}{} ", if last { " " } else { g.vertical });
        let rendered = draw(child, &child_prefix, charset);

        out.push_str(prefix);
        out.push_str(if last { g.last } else { g.branch });
        out.push_str(g.horizontal);
        out.push_str(if more { g.tee } else { g.horizontal });
        out.push(' ');
        out.push_str(&rendered[child_prefix.len()..]);
    }

    out
}
