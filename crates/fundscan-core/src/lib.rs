#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
pub mod fund;
pub mod paths;
pub mod pkg;
pub mod render;
pub mod version;

pub use config::Config;
pub use error::FundError;
pub use fund::{
    aggregate, count_funded, funding_report, select_funding, FundOptions, FundSelection,
    Funding, FundingEntry, FundingSummary, FundingTreeNode,
};
pub use pkg::{find_package, PackageGraph, PackageNode};
pub use render::{render_human, to_json, Charset, RenderNode};
pub use version::VERSION;
