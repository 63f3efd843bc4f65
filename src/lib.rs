//! # media-files-manager
//!
//! Safe naming, directory and deletion helpers for a local media toolkit,
//! plus the small parsers that drive page-range and clip operations.
//!
//! Document, image, video and download transformations live outside this
//! crate. They call in here to decide *where* an output goes, *whether* a
//! path may be touched, and *which* pages or seconds the user asked for, and
//! they report back through one uniform [`OperationResult`].
//!
//! ## Overview
//!
//! ```text
//! user strings ──▶ parse      page bounds / selectors / durations
//! output path  ──▶ fs         sanitize ─▶ resolve (name(1).ext) ─▶ sandbox
//! any result   ──▶ history    per-category JSON-lines activity log
//! folders      ──▶ batch      bulk rename / remove, progress callbacks
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use media_files_manager::{parse_page_bounds, Sandbox};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sandbox = Sandbox::from_current_dir()?;
//!
//!     // Where should "report.pdf" go without overwriting anything?
//!     let out = sandbox.resolver().sanitize_and_deduplicate("exports/report.pdf");
//!     sandbox.make_directory("exports");
//!     println!("writing {}", out);
//!
//!     let (start, end) = parse_page_bounds(12, "3", "40")?;
//!     assert_eq!((start, end), (3, 12));
//!
//!     let r = sandbox.remove_file("exports/old.pdf");
//!     println!("{}", r.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mfm` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod fs;
pub mod history;
pub mod output;
pub mod parse;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{remove_files, remove_files_async, rename_all, rename_all_async};
pub use config::{ManagerConfig, ManagerConfigBuilder};
pub use error::MfmError;
pub use fs::{
    sanitize_and_deduplicate, sanitize_component, sanitize_file_name, DirectoryHandle, HasPath,
    PathHandle, PathResolver, Sandbox,
};
pub use history::{initialize_workspace, ActivityLog, LogCategory};
pub use output::OperationResult;
pub use parse::{
    parse_duration_seconds, parse_page_bounds, parse_page_selector, parse_page_selector_for,
    parse_timestamp_seconds, PageSelection, MAX_SELECTOR_PAGES,
};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
