//! `fundscan count`: the short post-install funding report.

use fundscan_core::{count_funded, funding_report, Config};
use miette::Result;

use super::exit_with_error;
use super::source::{self, GraphSource};

/// Run the count command.
pub fn run(config: &Config, source: &GraphSource) -> Result<()> {
    let graph = match source::load(&config.cwd, source) {
        Ok(graph) => graph,
        Err(e) => exit_with_error(&e, config.json),
    };

    let length = count_funded(&graph);

    if config.json {
        println!("{}", serde_json::json!({ "ok": true, "length": length }));
    } else if let Some(report) = funding_report(length, false) {
        println!("{report}");
    }

    Ok(())
}
