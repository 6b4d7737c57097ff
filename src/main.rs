//! CI Graph CLI
//!
//! Usage:
//!   ci-graph --view <FILE> --records <FILE> [OPTIONS]
//!
//! Options:
//!   -o, --options <FILE>     Render options (TOML format)
//!   --version-support        Highlight unconfirmed and unchanged records
//!   --image-root <DIR>       Directory relative icon paths resolve against
//!   --output <FILE>          Write the DOT document to a file
//!   -v, --verbose            Log skipped records and dropped edges

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ci_graph::input::{parse_records, parse_view, read_source};
use ci_graph::{render_with_options, LoadError, RenderOptions};

#[derive(Parser)]
#[command(name = "ci-graph")]
#[command(about = "Render configuration views to Graphviz DOT")]
struct Cli {
    /// View definition (JSON)
    #[arg(long)]
    view: PathBuf,

    /// Root records (JSON list)
    #[arg(long)]
    records: PathBuf,

    /// Render options file (TOML format)
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Highlight unconfirmed and unchanged records
    #[arg(long)]
    version_support: bool,

    /// Directory that relative icon paths resolve against
    #[arg(long)]
    image_root: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log skipped records and dropped edges
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut options = match &cli.options {
        Some(path) => match RenderOptions::from_file(path) {
            Ok(o) => o,
            Err(e) => {
                let source = fs::read_to_string(path).unwrap_or_default();
                fail(&e, &source, path);
            }
        },
        None => RenderOptions::default(),
    };
    if cli.version_support {
        options = options.with_version_support(true);
    }
    if let Some(root) = cli.image_root {
        options = options.with_image_root(root);
    }

    let view = load(&cli.view, parse_view);
    let records = load(&cli.records, parse_records);

    let dot = match render_with_options(&view, &records, &options) {
        Ok(dot) => dot,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, dot) {
                eprintln!("Error writing '{}': {}", path.display(), e);
                process::exit(1);
            }
        }
        None => print!("{}", dot),
    }
}

/// Read and decode an input file, exiting with a diagnostic on failure
fn load<T>(path: &Path, parse: fn(&str) -> Result<T, LoadError>) -> T {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(e) => fail(&e, "", path),
    };
    match parse(&source) {
        Ok(value) => value,
        Err(e) => fail(&e, &source, path),
    }
}

fn fail(error: &LoadError, source: &str, path: &Path) -> ! {
    let filename = path.display().to_string();
    eprintln!("{}", error.format(source, &filename));
    process::exit(1);
}
