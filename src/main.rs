//! sizemap - where did the disk space go?
//!
//! Scans a directory tree to a fixed depth, writes the sized tree as JSON
//! and optionally drops shortcut files pointing at the largest items.
//!
//! Usage:
//!   sizemap                              Scan the home directory, depth 3
//!   sizemap --path /srv --depth 5        Scan deeper somewhere else
//!   sizemap --shortcuts 50               Also link the 50 largest items
//!   sizemap --help                       Show help

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, bail, eyre};
use tracing_subscriber::EnvFilter;

use sizemap_scan::{EstimatorStrategy, ScanConfig, ScanError, Walker};
use sizemap_shortcuts::{ShortcutConfig, ShortcutFormat};

#[derive(Parser)]
#[command(
    name = "sizemap",
    version,
    about = "Scan directories and write size information as JSON",
    long_about = "sizemap walks a directory tree up to --depth levels, totals the size of \
                  every file and folder, and writes the result as a JSON tree sorted by \
                  size. Folders below the depth limit are sized in bulk with `du`, \
                  falling back to an in-process walk."
)]
struct Cli {
    /// Directory to scan (defaults to your home directory)
    #[arg(long)]
    path: Option<PathBuf>,

    /// Maximum depth to enumerate
    #[arg(long, default_value = "3")]
    depth: u32,

    /// Output JSON file
    #[arg(long, default_value = "disk-report.json")]
    output: PathBuf,

    /// Generate shortcuts for the top N largest items (0 disables)
    #[arg(long, default_value = "0")]
    shortcuts: usize,

    /// Directory to store shortcuts (replaced on each run)
    #[arg(long, default_value = "./shortcuts")]
    shortcuts_dir: PathBuf,

    /// Shortcut file format (defaults to the platform's native one)
    #[arg(long)]
    shortcut_format: Option<FormatArg>,

    /// How to size folders that are not enumerated
    #[arg(long, default_value = "auto")]
    estimator: EstimatorArg,

    /// Seconds to wait for one `du` call before falling back
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    du_timeout: u64,

    /// Log every directory as it is scanned
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EstimatorArg {
    /// du, then a manual walk
    Auto,
    /// du only
    Du,
    /// Manual walk only
    Walk,
}

impl From<EstimatorArg> for EstimatorStrategy {
    fn from(arg: EstimatorArg) -> Self {
        match arg {
            EstimatorArg::Auto => EstimatorStrategy::Auto,
            EstimatorArg::Du => EstimatorStrategy::BulkOnly,
            EstimatorArg::Walk => EstimatorStrategy::ManualOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// macOS .webloc
    Webloc,
    /// freedesktop .desktop link
    Desktop,
}

impl From<FormatArg> for ShortcutFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Webloc => ShortcutFormat::Webloc,
            FormatArg::Desktop => ShortcutFormat::Desktop,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let target = resolve_target(cli.path.as_deref())?;
    if !target.exists() {
        bail!("Path does not exist: {}", target.display());
    }

    let config = ScanConfig::builder()
        .root(target.clone())
        .max_depth(cli.depth)
        .estimator(EstimatorStrategy::from(cli.estimator))
        .du_timeout(Duration::from_secs(cli.du_timeout))
        .build()
        .map_err(ScanError::from)?;

    println!("Scanning: {}", target.display());
    println!("Max depth: {}", cli.depth);
    println!();

    let tree = Walker::new(config).scan().context("Scan failed")?;

    write_report(&tree.root, &cli.output)?;

    println!("Total size: {}", format_size(tree.total_size()));
    println!("Report written to: {}", cli.output.display());
    if tree.has_warnings() {
        eprintln!(
            "{} warning(s) during scan (run with --verbose for details)",
            tree.warnings.len()
        );
    }

    if cli.shortcuts > 0 {
        println!();
        let format = cli
            .shortcut_format
            .map(ShortcutFormat::from)
            .unwrap_or_else(ShortcutFormat::native);
        let shortcuts = ShortcutConfig::new(&cli.shortcuts_dir, cli.shortcuts).with_format(format);
        let summary = sizemap_shortcuts::generate(&tree.root, &shortcuts)
            .context("Failed to generate shortcuts")?;
        println!(
            "Created {} shortcuts in {}/",
            summary.created,
            cli.shortcuts_dir.display()
        );
    }

    println!("\nDone!");
    Ok(())
}

/// Absolute scan root: the given path with `~` expanded, or the home
/// directory.
fn resolve_target(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => expand_tilde(p),
        None => dirs::home_dir()
            .ok_or_else(|| eyre!("Could not determine home directory; pass --path"))?,
    };
    std::path::absolute(&path).with_context(|| format!("Invalid path: {}", path.display()))
}

fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Write the tree as pretty-printed JSON.
fn write_report(root: &sizemap_scan::TreeNode, output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(root)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write report to {}", output.display()))
}

fn setup_logging(verbose: bool) {
    let default = if verbose {
        "sizemap=debug,sizemap_scan=debug,sizemap_shortcuts=debug,warn"
    } else {
        "sizemap=info,sizemap_scan=info,sizemap_shortcuts=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
