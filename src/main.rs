use clap::Parser;
use shelfmatch::cli::run_cli_with_config;
use std::path::PathBuf;
use std::process;

/// Reconcile a curated content catalog against a directory of downloaded
/// media files.
#[derive(Parser, Debug)]
#[command(name = "shelfmatch", version, about)]
struct Args {
    /// Directory containing the downloaded resource files
    resources_dir: PathBuf,

    /// Path to the catalog spreadsheet (CSV export)
    #[arg(short, long)]
    catalog: PathBuf,

    /// TOML configuration file overriding the built-in category table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON report of the pass to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run_cli_with_config(
        &args.resources_dir,
        &args.catalog,
        args.config.as_deref(),
        args.report.as_deref(),
    ) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
