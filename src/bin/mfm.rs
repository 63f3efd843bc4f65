//! CLI binary for media-files-manager.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ManagerConfig`, runs one operation and prints its result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use media_files_manager::{
    initialize_workspace, parse_duration_seconds, parse_page_bounds, parse_page_selector,
    parse_page_selector_for, remove_files_async, rename_all_async, ActivityLog,
    BatchProgressCallback, LogCategory, ManagerConfig, OperationResult, ProgressCallback, Sandbox,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch plus a log line per
/// item.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Working");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_item_start(&self, _index: usize, _total: usize, subject: &str) {
        self.bar.set_message(subject.to_string());
    }

    fn on_item_complete(&self, _index: usize, _total: usize, subject: &str) {
        self.bar.println(format!("  {} {}", green("✓"), subject));
        self.bar.inc(1);
    }

    fn on_item_error(&self, _index: usize, _total: usize, subject: &str, error: &str) {
        self.bar
            .println(format!("  {} {}  {}", red("✗"), subject, dim(error)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let failed = total.saturating_sub(success_count);
        if failed == 0 {
            eprintln!("{} {} done", green("✔"), bold(&success_count.to_string()));
        } else {
            eprintln!(
                "{} {}/{} done  ({} failed)",
                red("✘"),
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string())
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Where would a new file land without overwriting anything?
  mfm resolve "exports/Report: final?.pdf"

  # Create a folder inside the working directory
  mfm mkdir "Media Files Manager/Downloads"

  # Delete files (only inside the working directory)
  mfm remove old1.png old2.png

  # Replace text in every file name of a folder
  mfm rename-all photos "IMG_" "holiday-"

  # Page helpers
  mfm bounds 10 7 3        # → 3 7
  mfm select 1,3,3,5       # → 0 2 4 (zero-based)
  mfm select 3-900 --pages 5   # → 2 3 4

  # Clip length in seconds
  mfm duration 00:01:00 00:02:30   # → 90

  # Prepare output folders and log files, then view a log
  mfm init
  mfm history download --json

ENVIRONMENT VARIABLES:
  MFM_ROOT      Sandbox root (default: current directory)
  MFM_APP_DIR   Application directory under the root
  MFM_JSON      Emit JSON instead of text
  RUST_LOG      Override log filter (e.g. debug)
"#;

/// Safe file naming, sandboxed folders and page/time helpers.
#[derive(Parser, Debug)]
#[command(
    name = "mfm",
    version,
    about = "Safe file naming, sandboxed folders and page/time helpers",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Sandbox root; mutations outside it are refused.
    #[arg(long, global = true, env = "MFM_ROOT")]
    root: Option<PathBuf>,

    /// Application directory under the root.
    #[arg(long, global = true, env = "MFM_APP_DIR", default_value = "Media Files Manager")]
    app_dir: PathBuf,

    /// Output structured JSON instead of text.
    #[arg(long, global = true, env = "MFM_JSON")]
    json: bool,

    /// Do not append results to the activity log.
    #[arg(long, global = true, env = "MFM_NO_LOG")]
    no_log: bool,

    /// Disable progress bar.
    #[arg(long, global = true, env = "MFM_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "MFM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "MFM_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a sanitized, collision-free location for a file.
    Resolve { path: PathBuf },

    /// Create a directory (and parents) inside the sandbox.
    Mkdir { path: PathBuf },

    /// Permanently delete files inside the sandbox.
    Remove {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Replace text in the names of every entry of a folder.
    RenameAll {
        dir: PathBuf,
        remove: String,
        #[arg(default_value = "")]
        replace: String,
    },

    /// Clamp and order a start/end page pair.
    Bounds {
        pages: usize,
        start: String,
        end: String,
    },

    /// Expand a page selector (N, A,B,C or A-B) to zero-based indices.
    Select {
        spec: String,
        /// Page count of the document; pages past it are dropped.
        #[arg(long)]
        pages: Option<usize>,
    },

    /// Seconds between two timestamps (SS, MM:SS or HH:MM:SS).
    Duration { start: String, end: String },

    /// Create the application folders and log files.
    Init,

    /// Print the activity log of a category.
    History { category: LogCategory },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let sandbox = Sandbox::from_config(&config).context("Failed to open sandbox root")?;
    let log = ActivityLog::for_config(&sandbox, &config);

    match &cli.command {
        Command::Resolve { path } => {
            let handle = sandbox.resolver().sanitize_and_deduplicate(path);
            if cli.json {
                println!("{}", serde_json::json!({ "path": handle.to_string() }));
            } else {
                println!("{handle}");
            }
        }

        Command::Mkdir { path } => {
            let made = sandbox
                .try_make_directory(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            if cli.json {
                println!("{}", serde_json::json!({ "path": made }));
            } else if !cli.quiet {
                println!("{}", made.display());
            }
        }

        Command::Remove { paths } => {
            let progress = progress_callback(&cli, paths.len());
            let results = remove_files_async(sandbox.clone(), paths.clone(), progress)
                .await
                .context("Remove failed")?;
            record(&cli, &log, LogCategory::Main, &results);
            print_results(&cli, &results)?;
        }

        Command::RenameAll {
            dir,
            remove,
            replace,
        } => {
            let progress = progress_callback(&cli, 2);
            let result = rename_all_async(
                sandbox.clone(),
                dir.clone(),
                remove.clone(),
                replace.clone(),
                progress,
            )
            .await
            .context("Rename failed")?;
            if !cli.json && !cli.quiet {
                for (old, new) in &result.renamed {
                    println!("{old} → {new}");
                }
            }
            let results = vec![result];
            record(&cli, &log, LogCategory::Rename, &results);
            print_results(&cli, &results)?;
        }

        Command::Bounds { pages, start, end } => {
            let (s, e) = parse_page_bounds(*pages, start, end).context("Invalid page bounds")?;
            if cli.json {
                println!("{}", serde_json::json!({ "start": s, "end": e }));
            } else {
                println!("{s} {e}");
            }
        }

        Command::Select { spec, pages } => {
            let indices = match pages {
                Some(count) => parse_page_selector_for(*count, spec),
                None => parse_page_selector(spec),
            }
            .context("Invalid page selection")?;
            if cli.json {
                println!("{}", serde_json::to_string(&indices)?);
            } else {
                let text: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                println!("{}", text.join(" "));
            }
        }

        Command::Duration { start, end } => {
            let secs = parse_duration_seconds(start, end).context("Invalid time range")?;
            if cli.json {
                println!("{}", serde_json::json!({ "seconds": secs }));
            } else {
                println!("{secs}");
            }
        }

        Command::Init => {
            let results = initialize_workspace(&sandbox, &config);
            print_results(&cli, &results)?;
        }

        Command::History { category } => {
            let entries = log
                .read(*category)
                .with_context(|| format!("Failed to read {category} log"))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for e in &entries {
                    println!("{}  {}", dim(&e.timestamp), e.summary());
                }
            }
        }
    }

    Ok(())
}

/// Map CLI args to `ManagerConfig`.
fn build_config(cli: &Cli) -> Result<ManagerConfig> {
    let mut builder = ManagerConfig::builder().app_dir(&cli.app_dir);
    if let Some(ref root) = cli.root {
        builder = builder.root(root);
    }
    builder.build().context("Invalid configuration")
}

fn progress_callback(cli: &Cli, items: usize) -> Option<ProgressCallback> {
    let show = !cli.quiet && !cli.no_progress && !cli.json && items > 1;
    show.then(|| CliProgressCallback::new() as ProgressCallback)
}

/// Append results to the activity log unless disabled; log failures are
/// reported but do not fail the command.
fn record(cli: &Cli, log: &ActivityLog, category: LogCategory, results: &[OperationResult]) {
    if cli.no_log {
        return;
    }
    for r in results {
        if let Err(e) = log.write(category, r) {
            tracing::warn!("Could not write activity log: {}", e);
        }
    }
}

fn print_results(cli: &Cli, results: &[OperationResult]) -> Result<()> {
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(results).context("Failed to serialise results")?
        );
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }
    for r in results {
        let mark = if r.success { green("✔") } else { red("✘") };
        println!("{mark} {}", r.summary());
        for step in &r.steps {
            println!("    {} {}", red("✗"), dim(&step.summary()));
        }
    }
    Ok(())
}
