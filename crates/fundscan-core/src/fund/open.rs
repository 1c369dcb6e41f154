//! Choosing which funding URL to open for a single package.

use serde_json::Value;

use super::funding::{valid_entries, FundingEntry};
use crate::error::FundError;

/// Outcome of a targeted-open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundSelection {
    /// Exactly one source was chosen.
    Open(FundingEntry),
    /// Several sources and no selector; the caller should list them.
    Ambiguous(Vec<FundingEntry>),
}

/// Parse a 1-based `--which` selector.
pub fn parse_selector(which: &str, available: usize) -> Result<usize, FundError> {
    match which.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(FundError::invalid_selector(which, available)),
    }
}

/// Pick the funding source to open for `spec`.
///
/// `funding` is the raw declaration of the resolved package (`None` when
/// nothing matched). With a selector, that entry is opened or the selector
/// is rejected; without one, a lone entry is opened and several are
/// returned for listing.
pub fn select_funding(
    spec: &str,
    funding: Option<&Value>,
    which: Option<&str>,
) -> Result<FundSelection, FundError> {
    let mut entries = valid_entries(funding);

    let index = which
        .map(|w| parse_selector(w, entries.len()))
        .transpose()?;

    if entries.is_empty() {
        return Err(FundError::no_funding(spec));
    }

    match index {
        Some(n) if n <= entries.len() => Ok(FundSelection::Open(entries.swap_remove(n - 1))),
        Some(_) => Err(FundError::invalid_selector(
            which.unwrap_or_default(),
            entries.len(),
        )),
        None if entries.len() == 1 => Ok(FundSelection::Open(entries.swap_remove(0))),
        None => Ok(FundSelection::Ambiguous(entries)),
    }
}

/// `"<type> funding available at the following URL"`.
#[must_use]
pub fn url_message(entry: &FundingEntry) -> String {
    let prefix = entry
        .kind
        .as_deref()
        .map_or_else(|| "Funding".to_string(), |kind| format!("{kind} funding"));
    format!("{prefix} available at the following URL")
}

/// Numbered listing of every source plus a usage hint.
#[must_use]
pub fn ambiguity_listing(spec: &str, entries: &[FundingEntry]) -> String {
    let mut lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}: {}: {}", i + 1, entry.url, url_message(entry)))
        .collect();
    lines.push(format!(
        "Run `fundscan fund {spec} --which=1`, for example, to open the first funding URL listed in that package"
    ));
    lines.join("\n")
}
