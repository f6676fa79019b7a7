// ABOUTME: CLI entry point for mysql-dump-splitter
// ABOUTME: Parses flags, builds the filter policy, and runs the split

use anyhow::bail;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use mysql_dump_splitter::commands;
use mysql_dump_splitter::config;
use mysql_dump_splitter::filters::{Mode, SegmentFilter};
use mysql_dump_splitter::output::{OutputTarget, StreamTarget};

#[derive(Parser)]
#[command(name = "mysql-dump-splitter")]
#[command(about = "Split or process MySQL dumps", long_about = None)]
#[command(group(
    ArgGroup::new("destination")
        .required(true)
        .args(["outfile", "outdir"])
))]
struct Cli {
    /// Path to the dump file; a .gz suffix selects gzip input
    dump: PathBuf,
    /// Single file to output to; pass - for stdout
    #[arg(short = 'f', long)]
    outfile: Option<String>,
    /// Directory to output per-table files to
    #[arg(short = 'd', long)]
    outdir: Option<PathBuf>,
    /// Tables to include (comma-separated)
    #[arg(short = 'i', long, value_delimiter = ',')]
    include: Vec<String>,
    /// Tables to exclude (comma-separated)
    #[arg(short = 'e', long, value_delimiter = ',')]
    exclude: Vec<String>,
    /// Exclude data for these tables, keeping their schema (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude_data: Vec<String>,
    /// Which segment kinds to keep
    #[arg(short = 'm', long, value_enum, default_value = "both")]
    mode: Mode,
    /// Compress output with gzip
    #[arg(short = 'c', long)]
    compress: bool,
    /// Emit per-segment start/ignore diagnostics
    #[arg(short = 'v', long)]
    verbose: bool,
    /// TOML file with additional include/exclude/exclude-data lists
    #[arg(long)]
    filter_config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout stays clean for `--outfile -`.
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut include = cli.include;
    let mut exclude = cli.exclude;
    let mut exclude_data = cli.exclude_data;
    if let Some(path) = &cli.filter_config {
        let extra = config::load_filter_config(path)?;
        include.extend(extra.include);
        exclude.extend(extra.exclude);
        exclude_data.extend(extra.exclude_data);
    }
    let filter = SegmentFilter::new(include, exclude, exclude_data, cli.mode);

    // clap enforces that exactly one destination flag is present.
    let target = match (cli.outfile, cli.outdir) {
        (Some(path), None) if path == "-" => OutputTarget::Single(StreamTarget::Stdout),
        (Some(path), None) => OutputTarget::Single(StreamTarget::File(PathBuf::from(path))),
        (None, Some(dir)) => OutputTarget::PerEntity(dir),
        _ => bail!("Provide either --outfile or --outdir"),
    };

    commands::split(&cli.dump, filter, target, cli.compress)
}
