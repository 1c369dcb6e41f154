//! Funding extraction, aggregation and selection.

pub mod aggregate;
pub mod funding;
pub mod open;
pub mod report;

pub use aggregate::{aggregate, count_funded, FundOptions, FundingSummary, FundingTreeNode};
pub use funding::{is_valid, normalize, valid_entries, Funding, FundingEntry};
pub use open::{ambiguity_listing, parse_selector, select_funding, url_message, FundSelection};
pub use report::funding_report;
