use std::io::{self, BufWriter, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};

use modv::export::{self, ExportFormat, RenderOptions};
use modv::graph::{ModuleGraph, ParseOptions};
use modv::logger::init_logger;

#[cfg(target_os = "macos")]
const USAGE_EXAMPLE: &str =
    "go mod graph | modv | dot -T svg | open -f -a /System/Applications/Preview.app";

#[cfg(target_os = "windows")]
const USAGE_EXAMPLE: &str = "go mod graph | modv | dot -T png -o graph.png; start graph.png";

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const USAGE_EXAMPLE: &str =
    "go mod graph | modv | dot -T svg -o /tmp/modv.svg | xdg-open /tmp/modv.svg";

#[derive(Parser)]
#[command(name = "modv")]
#[command(version)]
#[command(about = "Visualize module dependency graphs with Graphviz", long_about = None)]
#[command(after_help = format!(
    "Usage example:\n\n    {USAGE_EXAMPLE}\n\n\
     The camelCase flag spellings (--ignoreVersion, --ignoreModules, --ignoreIndirect,\n\
     --hidePath, --hideVersion) are accepted with two dashes only."
))]
struct Cli {
    /// Treat all versions of the same module as one
    #[arg(long, alias = "ignoreVersion")]
    ignore_version: bool,

    /// Comma-separated list of modules to ignore, including path (e.g. golang.org/x/sys)
    #[arg(
        long,
        alias = "ignoreModules",
        value_name = "MODULES",
        value_delimiter = ','
    )]
    ignore_modules: Vec<String>,

    /// Only keep dependencies declared by the root module
    #[arg(long, alias = "ignoreIndirect")]
    ignore_indirect: bool,

    /// Do not display module paths
    #[arg(long, alias = "hidePath")]
    hide_path: bool,

    /// Do not display module versions [default: same as --ignore-version]
    #[arg(
        long,
        alias = "hideVersion",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    hide_version: Option<bool>,

    /// Output format: dot, json
    #[arg(short, long, value_name = "FORMAT", default_value_t = ExportFormat::Dot)]
    format: ExportFormat,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        let excluded = self
            .ignore_modules
            .iter()
            .map(|module| module.trim())
            .filter(|module| !module.is_empty())
            .map(str::to_string);

        ParseOptions {
            fold_versions: self.ignore_version,
            skip_indirect: self.ignore_indirect,
            ..ParseOptions::default()
        }
        .with_excluded_modules(excluded)
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            hide_path: self.hide_path,
            hide_version: self.hide_version.unwrap_or(self.ignore_version),
        }
    }
}

fn print_usage() {
    eprintln!("\nUsage:\n\n    {USAGE_EXAMPLE}\n");
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet, cli.no_color);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("modv is intended to work with pipes");
    }

    let parse_options = cli.parse_options();
    debug!(?parse_options, "parsing module graph");

    let graph = ModuleGraph::parse(stdin.lock(), &parse_options)
        .context("Failed to build module graph")?;

    info!(
        modules = graph.module_count(),
        edges = graph.edge_count(),
        "module graph ready"
    );

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    export::export(cli.format, &graph, &cli.render_options(), &mut writer)
        .with_context(|| format!("Failed to render module graph as {}", cli.format))?;
    writer.flush().context("Failed to write output")?;

    Ok(())
}
