//! `fundscan fund` command implementation.
//!
//! Without a package, prints every funded dependency grouped by URL (or the
//! aggregated summary as JSON). With a package, opens that package's
//! funding URL, or lists its sources when there are several.

use fundscan_core::fund::{ambiguity_listing, url_message};
use fundscan_core::pkg::find_package;
use fundscan_core::render::{render_human, to_json};
use fundscan_core::{aggregate, select_funding, Config, FundOptions, FundSelection, FundingEntry};
use miette::{miette, IntoDiagnostic, Result};
use std::process::Command;
use tracing::{debug, info};

use super::exit_with_error;
use super::source::{self, GraphSource};

/// Fund command action.
#[derive(Debug, Clone)]
pub struct FundAction {
    /// Package reference to open; `None` lists everything.
    pub package: Option<String>,
    /// 1-based funding source index.
    pub which: Option<String>,
    pub source: GraphSource,
}

/// Run the fund command.
pub fn run(config: &Config, action: FundAction) -> Result<()> {
    let graph = match source::load(&config.cwd, &action.source) {
        Ok(graph) => graph,
        Err(e) => exit_with_error(&e, config.json),
    };

    let Some(spec) = action.package.as_deref() else {
        let summary = aggregate(&graph, &FundOptions::default());
        debug!(length = summary.length, "aggregated funding");
        if config.json {
            println!("{}", to_json(&summary).into_diagnostic()?);
        } else {
            println!("{}", render_human(&summary, config.charset()));
        }
        return Ok(());
    };

    let node = find_package(&graph, spec, &config.cwd);
    debug!(spec, found = node.is_some(), "resolved package reference");

    let funding = node.and_then(|n| n.funding.as_ref());
    match select_funding(spec, funding, action.which.as_deref()) {
        Ok(FundSelection::Open(entry)) => open_url(config, &entry),
        Ok(FundSelection::Ambiguous(entries)) => {
            if config.json {
                let sources: Vec<_> = entries.iter().map(entry_json).collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&sources).into_diagnostic()?
                );
            } else {
                println!("{}", ambiguity_listing(spec, &entries));
            }
            Ok(())
        }
        Err(e) => exit_with_error(&e, config.json),
    }
}

fn entry_json(entry: &FundingEntry) -> serde_json::Value {
    serde_json::json!({
        "title": url_message(entry),
        "url": entry.url
    })
}

/// Open `entry` in the configured browser, or print it.
fn open_url(config: &Config, entry: &FundingEntry) -> Result<()> {
    if config.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&entry_json(entry)).into_diagnostic()?
        );
        return Ok(());
    }

    let Some(browser) = config.browser.as_deref() else {
        println!("{}:\n  {}", url_message(entry), entry.url);
        return Ok(());
    };

    let program = which::which(browser)
        .map_err(|e| miette!("Failed to locate browser '{}': {}", browser, e))?;
    info!(browser = %program.display(), url = %entry.url, "opening funding URL");

    let status = Command::new(&program)
        .arg(&entry.url)
        .status()
        .map_err(|e| miette!("Failed to launch {}: {}", program.display(), e))?;

    if status.success() {
        Ok(())
    } else {
        Err(miette!("{} exited with {}", program.display(), status))
    }
}
