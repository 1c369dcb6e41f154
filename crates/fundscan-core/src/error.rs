use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, surfaced in JSON output.
pub mod codes {
    pub const FUND_NO_FUNDING: &str = "FUND_NO_FUNDING";
    pub const FUND_INVALID_SELECTOR: &str = "FUND_INVALID_SELECTOR";
    pub const FUND_PROJECT_NOT_FOUND: &str = "FUND_PROJECT_NOT_FOUND";
    pub const FUND_GRAPH_READ: &str = "FUND_GRAPH_READ";
    pub const FUND_GRAPH_PARSE: &str = "FUND_GRAPH_PARSE";
    pub const FUND_IO_ERROR: &str = "FUND_IO_ERROR";
}

/// Core error type for fundscan operations.
#[derive(Error, Debug)]
pub enum FundError {
    #[error("No valid funding method available for: {spec}")]
    NoFunding { spec: String },

    #[error("--which={which} is not a valid index{}", range_hint(.available))]
    InvalidSelector { which: String, available: usize },

    #[error("Project root not found from {start}")]
    ProjectNotFound { start: PathBuf },

    #[error("Failed to read graph at {path}: {source}")]
    GraphRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse graph at {path}: {source}")]
    GraphParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn range_hint(available: &usize) -> String {
    match *available {
        0 => String::new(),
        1 => " (only 1 funding source available)".to_string(),
        n => format!(" (expected 1..={n})"),
    }
}

impl FundError {
    /// Get the stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoFunding { .. } => codes::FUND_NO_FUNDING,
            Self::InvalidSelector { .. } => codes::FUND_INVALID_SELECTOR,
            Self::ProjectNotFound { .. } => codes::FUND_PROJECT_NOT_FOUND,
            Self::GraphRead { .. } => codes::FUND_GRAPH_READ,
            Self::GraphParse { .. } => codes::FUND_GRAPH_PARSE,
            Self::Io(_) => codes::FUND_IO_ERROR,
        }
    }

    pub fn no_funding(spec: impl Into<String>) -> Self {
        Self::NoFunding { spec: spec.into() }
    }

    pub fn invalid_selector(which: impl Into<String>, available: usize) -> Self {
        Self::InvalidSelector {
            which: which.into(),
            available,
        }
    }
}
