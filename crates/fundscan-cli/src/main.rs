#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use fundscan_core::paths::project_root;
use fundscan_core::pkg::{load_npmrc_files, LoadOptions};
use fundscan_core::Config;
use miette::Result;
use std::path::PathBuf;

use commands::fund::FundAction;
use commands::source::GraphSource;

#[derive(Parser, Debug)]
#[command(name = "fundscan")]
#[command(author, version, about = "Show which installed dependencies are looking for funding", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where to read the dependency graph from.
#[derive(clap::Args, Debug, Clone)]
struct GraphArgs {
    /// Read the graph from a JSON fixture instead of node_modules
    #[arg(long, value_name = "FILE")]
    graph: Option<PathBuf>,

    /// Skip the root package's devDependencies
    #[arg(long)]
    no_dev: bool,

    /// Skip optionalDependencies
    #[arg(long)]
    no_optional: bool,

    /// Skip peerDependencies
    #[arg(long)]
    no_peer: bool,
}

impl GraphArgs {
    fn into_source(self) -> GraphSource {
        GraphSource {
            fixture: self.graph,
            options: LoadOptions {
                include_dev: !self.no_dev,
                include_optional: !self.no_optional,
                include_peer: !self.no_peer,
            },
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// List funded dependencies, or open a package's funding URL
    Fund {
        /// Package name or directory to open the funding URL of
        package: Option<String>,

        /// Which funding source to open when the package lists several (1-based)
        #[arg(long, value_name = "N", requires = "package")]
        which: Option<String>,

        /// Draw the tree with Unicode characters
        #[arg(long, overrides_with = "no_unicode")]
        unicode: bool,

        /// Draw the tree with ASCII characters
        #[arg(long, overrides_with = "unicode")]
        no_unicode: bool,

        /// Command used to open funding URLs
        #[arg(long, env = "FUNDSCAN_BROWSER", value_name = "CMD")]
        browser: Option<String>,

        /// Print funding URLs instead of opening them (wins over --browser)
        #[arg(long)]
        no_browser: bool,

        #[command(flatten)]
        graph: GraphArgs,
    },

    /// Print how many installed packages are looking for funding
    Count {
        #[command(flatten)]
        graph: GraphArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // .npmrc first, then flags on top
    let npmrc_dir = project_root(&cwd).unwrap_or_else(|| cwd.clone());
    let mut config = Config::new(cwd)
        .with_npmrc(&load_npmrc_files(&npmrc_dir))
        .with_verbosity(cli.verbose);
    if cli.json {
        config = config.with_json(true);
    }

    logging::init(config.verbosity, config.json);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(config.json),
        Some(Commands::Fund {
            package,
            which,
            unicode,
            no_unicode,
            browser,
            no_browser,
            graph,
        }) => {
            if unicode {
                config = config.with_unicode(true);
            } else if no_unicode {
                config = config.with_unicode(false);
            }
            if no_browser {
                config = config.with_browser(None);
            } else if browser.is_some() {
                config = config.with_browser(browser);
            }

            commands::fund::run(
                &config,
                FundAction {
                    package,
                    which,
                    source: graph.into_source(),
                },
            )
        }
        Some(Commands::Count { graph }) => commands::count::run(&config, &graph.into_source()),
    }
}
