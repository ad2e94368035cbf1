//! split-works - Split a complete-works text file into one file per work

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::SplitWorksConfig;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::path::{Path, PathBuf};
use work_splitter::{Catalog, SplitReport, WorkStatus};

#[derive(Parser, Debug)]
#[command(name = "split-works")]
#[command(
    about = "Split a concatenated complete-works text file into one file per work",
    long_about = "Streams the input once and cuts it at each title of an ordered catalog. \
                  The table of contents, non-retained works and cast lists are discarded."
)]
#[command(version)]
struct Args {
    /// Path to the complete works text file
    #[arg(short, long, default_value = "pg100.txt")]
    input: PathBuf,

    /// Output directory (default: from config, else shakespeare_plays)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Catalog TOML to use instead of the built-in PG100 catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Write a JSON report of every catalog entry's outcome
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log every saved work instead of showing a progress bar
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Inspect or export the active catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Overwrite the configuration file with defaults
    Reset,
    /// Set default output directory
    SetOutputDir {
        /// Directory for split works
        path: PathBuf,
    },
    /// Use a catalog TOML file by default
    SetCatalog {
        /// Path to catalog TOML
        path: PathBuf,
    },
    /// Go back to the built-in PG100 catalog
    ClearCatalog,
    /// Set how many body lines are buffered between writes
    SetFlushThreshold {
        /// Number of lines (at least 1)
        value: usize,
    },
    /// Set how many lines after a title are searched for the first act
    SetPreambleLimit {
        /// Number of lines (at least 1)
        value: usize,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogAction {
    /// List catalog entries in order
    Show,
    /// Write the active catalog as TOML
    Export {
        /// Destination file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.debug);

    match &args.command {
        // Config actions read the file themselves, so a broken file can still be reset.
        Some(Commands::Config { action }) => {
            return handle_config_command(action, &SplitWorksConfig::config_path()?);
        }
        Some(Commands::Catalog { action }) => {
            let config = SplitWorksConfig::load().context("Failed to load configuration")?;
            let catalog = resolve_catalog(args.catalog.as_deref(), &config)?;
            return handle_catalog_command(action, &catalog);
        }
        None => {}
    }

    let config = SplitWorksConfig::load().context("Failed to load configuration")?;

    if !args.input.is_file() {
        anyhow::bail!(
            "Input file not found: {}. Run 'split-works --help' for usage.",
            args.input.display()
        );
    }

    let catalog = resolve_catalog(args.catalog.as_deref(), &config)?;
    let output_dir = args.output.clone().unwrap_or_else(|| config.output_dir());
    let options = config.segmenter_options();

    debug!("Input: {}", args.input.display());
    debug!("Output: {}", output_dir.display());
    debug!(
        "Catalog: {} entries, {} retained",
        catalog.len(),
        catalog.retained_count()
    );
    debug!("Flush threshold: {}", options.flush_threshold);
    debug!("Preamble limit: {}", options.preamble_limit);

    let pb = if args.verbose || args.debug {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(catalog.retained_count() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = work_splitter::split_file(&args.input, &output_dir, &catalog, options, |work| {
        pb.set_message(work.output_id.clone());
        pb.inc(1);
    })
    .with_context(|| format!("Failed to split {}", args.input.display()))?;

    pb.finish_and_clear();

    if let Some(ref path) = args.report {
        report
            .save_json(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        eprintln!("Report: {}", path.display());
    }

    print_summary(&report, &output_dir);
    Ok(())
}

fn init_logging(verbose: bool, debug: bool) {
    let default_filter = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Pick the catalog: flag, then config, then the built-in PG100 list.
fn resolve_catalog(flag: Option<&Path>, config: &SplitWorksConfig) -> Result<Catalog> {
    match flag.or(config.catalog.as_deref()) {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Ok(Catalog::pg100()),
    }
}

fn print_summary(report: &SplitReport, output_dir: &Path) {
    let discarded = report
        .works
        .iter()
        .filter(|w| matches!(w.status, WorkStatus::Discarded { .. }))
        .count();

    eprintln!(
        "\nSeparated {} work(s) into the '{}/' directory.",
        report.saved,
        output_dir.display()
    );
    if discarded > 0 {
        eprintln!("{} non-retained work(s) and all cast lists were discarded.", discarded);
    }

    let unmatched: Vec<&str> = report.unmatched().map(|w| w.title.as_str()).collect();
    if !unmatched.is_empty() {
        eprintln!("Titles never found ({}):", unmatched.len());
        for title in unmatched {
            eprintln!("  {}", title);
        }
    }

    let ambiguous: Vec<&str> = report.ambiguous().map(|w| w.output_id.as_str()).collect();
    if !ambiguous.is_empty() {
        eprintln!("Preamble cut needs review: {}", ambiguous.join(", "));
    }
}

fn handle_catalog_command(action: &CatalogAction, catalog: &Catalog) -> Result<()> {
    match action {
        CatalogAction::Show => {
            for (i, entry) in catalog.entries().iter().enumerate() {
                let target = if entry.retain {
                    format!("{}.txt", entry.output_id)
                } else {
                    "(discarded)".to_string()
                };
                println!("{:>3}. {} -> {}", i + 1, entry.title, target);
            }
            println!();
            println!(
                "{} entries, {} retained. Table of contents ends at: {}",
                catalog.len(),
                catalog.retained_count(),
                catalog.terminator()
            );
        }
        CatalogAction::Export { path } => {
            catalog
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Catalog written to: {}", path.display());
        }
    }
    Ok(())
}

fn handle_config_command(action: &ConfigAction, config_path: &Path) -> Result<()> {
    // Reset never reads the existing file, so it can replace a broken one.
    let mut config = match action {
        ConfigAction::Reset => SplitWorksConfig::default(),
        _ => SplitWorksConfig::load_from(config_path).context(
            "Failed to load configuration. Run 'split-works config reset' to start over",
        )?,
    };

    match action {
        ConfigAction::Reset => {
            println!("Configuration reset: {}", config_path.display());
        }
        ConfigAction::Show => {
            println!("Configuration file: {:?}", config_path);
            println!();
            println!("output_dir = \"{}\"", config.output_dir().display());
            if let Some(catalog) = &config.catalog {
                println!("catalog = \"{}\"", catalog.display());
            } else {
                println!("catalog = (built-in PG100)");
            }
            println!("flush_threshold = {}", config.flush_threshold);
            println!("preamble_limit = {}", config.preamble_limit);
            return Ok(());
        }
        ConfigAction::SetOutputDir { path } => {
            config.output_dir = Some(path.clone());
            println!("Default output directory set to: {}", path.display());
        }
        ConfigAction::SetCatalog { path } => {
            // Refuse to store a catalog that would fail on the next run.
            Catalog::load(path).with_context(|| format!("Invalid catalog {}", path.display()))?;
            config.catalog = Some(path.clone());
            println!("Default catalog set to: {}", path.display());
        }
        ConfigAction::ClearCatalog => {
            config.catalog = None;
            println!("Using the built-in PG100 catalog");
        }
        ConfigAction::SetFlushThreshold { value } => {
            config.flush_threshold = (*value).max(1);
            println!("Flush threshold set to: {}", config.flush_threshold);
        }
        ConfigAction::SetPreambleLimit { value } => {
            config.preamble_limit = (*value).max(1);
            println!("Preamble limit set to: {}", config.preamble_limit);
        }
    }
    config.save_to(config_path)
}
