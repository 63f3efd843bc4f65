//! Activity log: persistent history of [`OperationResult`]s.
//!
//! Each [`LogCategory`] has its own append-only JSON-lines file inside the
//! configured log directory. One line is one serialised result, so a crash
//! mid-write loses at most the last entry and readers can skip a torn line.

use crate::config::ManagerConfig;
use crate::error::MfmError;
use crate::fs::Sandbox;
use crate::output::OperationResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Which history file an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogCategory {
    Download,
    Pdf,
    Video,
    Image,
    Audio,
    Main,
    Rename,
}

impl LogCategory {
    pub const ALL: [LogCategory; 7] = [
        LogCategory::Download,
        LogCategory::Pdf,
        LogCategory::Video,
        LogCategory::Image,
        LogCategory::Audio,
        LogCategory::Main,
        LogCategory::Rename,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogCategory::Download => "Download",
            LogCategory::Pdf => "PDF",
            LogCategory::Video => "Video",
            LogCategory::Image => "Image",
            LogCategory::Audio => "Audio",
            LogCategory::Main => "Main",
            LogCategory::Rename => "Rename",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.jsonl", self.name())
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogCategory {
    type Err = MfmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogCategory::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MfmError::invalid(s, "unknown log category"))
    }
}

/// Reader/writer for the per-category history files.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    dir: PathBuf,
}

impl ActivityLog {
    /// Log files live directly in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Log directory from `config`, resolved inside the sandbox.
    pub fn for_config(sandbox: &Sandbox, config: &ManagerConfig) -> Self {
        Self::new(sandbox.absolute(config.log_dir()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, category: LogCategory) -> PathBuf {
        self.dir.join(category.file_name())
    }

    /// Append one entry to `category`'s file, creating it if needed.
    pub fn write(&self, category: LogCategory, entry: &OperationResult) -> Result<(), MfmError> {
        let path = self.path_for(category);
        let mut line =
            serde_json::to_string(entry).map_err(|e| MfmError::Serialization(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| MfmError::io(&path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| MfmError::io(&path, e))?;
        debug!("Logged {} entry for {}", category, entry.subject);
        Ok(())
    }

    /// All entries of `category`, oldest first.
    ///
    /// A missing file is an empty history. Lines that fail to parse are
    /// skipped with a warning.
    pub fn read(&self, category: LogCategory) -> Result<Vec<OperationResult>, MfmError> {
        let path = self.path_for(category);
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(MfmError::io(&path, e)),
        };

        let mut entries = Vec::new();
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| MfmError::io(&path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<OperationResult>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping malformed line {} in {}: {}", n + 1, path.display(), e),
            }
        }
        Ok(entries)
    }

    /// Create every category file that does not exist yet.
    ///
    /// Existing files are left untouched.
    pub fn ensure_files(&self) -> Result<(), MfmError> {
        for category in LogCategory::ALL {
            let path = self.path_for(category);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => debug!("Created log file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(MfmError::io(&path, e)),
            }
        }
        Ok(())
    }
}

/// Prepare the application workspace inside `sandbox`.
///
/// Creates every output folder from `config` and the log files. Returns one
/// result per folder plus one for the log files; failures do not stop the
/// remaining steps.
pub fn initialize_workspace(sandbox: &Sandbox, config: &ManagerConfig) -> Vec<OperationResult> {
    const OPERATION: &str = "Initialize";
    let mut results = Vec::new();

    for dir in config.output_paths().into_iter().chain([config.log_dir()]) {
        let subject = OperationResult::subject_path(&dir);
        if results
            .iter()
            .any(|r: &OperationResult| r.subject == subject)
        {
            continue;
        }
        let result = match sandbox.try_make_directory(&dir) {
            Ok(made) => OperationResult::success(subject, OPERATION, "Directory ready")
                .with_save_location(made),
            Err(e) => OperationResult::failure(subject, OPERATION, e.to_string()),
        };
        results.push(result);
    }

    let log = ActivityLog::for_config(sandbox, config);
    let subject = OperationResult::subject_path(log.dir());
    let ensured = if sandbox.contains(log.dir()) {
        log.ensure_files()
    } else {
        Err(MfmError::RestrictionViolation {
            path: log.dir().to_path_buf(),
            root: sandbox.root().to_path_buf(),
        })
    };
    results.push(match ensured {
        Ok(()) => OperationResult::success(subject, OPERATION, "Log files ready"),
        Err(e) => OperationResult::failure(subject, OPERATION, e.to_string()),
    });

    let failed = results.iter().filter(|r| !r.success).count();
    info!(
        "Workspace initialised in {} ({} steps, {} failed)",
        sandbox.root().display(),
        results.len(),
        failed
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Sandbox, ManagerConfig) {
        let dir = TempDir::new().unwrap();
        let sb = Sandbox::new(dir.path()).unwrap();
        let config = ManagerConfig::builder()
            .root(dir.path())
            .build()
            .unwrap();
        (dir, sb, config)
    }

    #[test]
    fn category_names_round_trip() {
        for c in LogCategory::ALL {
            assert_eq!(c.name().parse::<LogCategory>().unwrap(), c);
        }
        assert_eq!("pdf".parse::<LogCategory>().unwrap(), LogCategory::Pdf);
        assert!("nope".parse::<LogCategory>().is_err());
    }

    #[test]
    fn write_then_read_preserves_order() {
        let (_d, sb, config) = setup();
        initialize_workspace(&sb, &config);
        let log = ActivityLog::for_config(&sb, &config);

        let a = OperationResult::success("a.pdf", "Split PDF", "ok");
        let b = OperationResult::failure("b.pdf", "Split PDF", "corrupt");
        log.write(LogCategory::Pdf, &a).unwrap();
        log.write(LogCategory::Pdf, &b).unwrap();

        assert_eq!(log.read(LogCategory::Pdf).unwrap(), vec![a, b]);
        assert!(log.read(LogCategory::Video).unwrap().is_empty());
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let log = ActivityLog::new(dir.path());
        assert!(log.read(LogCategory::Main).unwrap().is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let log = ActivityLog::new(dir.path());
        let good = OperationResult::success("x", "Remove", "ok");
        log.write(LogCategory::Main, &good).unwrap();
        fs::OpenOptions::new()
            .append(true)
            .open(log.path_for(LogCategory::Main))
            .unwrap()
            .write_all(b"{not json\n\n")
            .unwrap();
        assert_eq!(log.read(LogCategory::Main).unwrap(), vec![good]);
    }

    #[test]
    fn initialize_creates_folders_and_keeps_existing_logs() {
        let (_d, sb, config) = setup();
        let results = initialize_workspace(&sb, &config);
        assert!(results.iter().all(|r| r.success), "{results:?}");
        for p in config.output_paths() {
            assert!(sb.root().join(p).is_dir());
        }

        let log = ActivityLog::for_config(&sb, &config);
        let entry = OperationResult::success("u", "Download", "ok");
        log.write(LogCategory::Download, &entry).unwrap();

        // Second run must not truncate.
        initialize_workspace(&sb, &config);
        assert_eq!(log.read(LogCategory::Download).unwrap(), vec![entry]);
    }

    #[test]
    fn log_dir_outside_sandbox_fails_without_panic() {
        let (_d, sb, _) = setup();
        let outside = TempDir::new().unwrap();
        let config = ManagerConfig::builder()
            .log_dir(outside.path().join("logs"))
            .output_dirs(Vec::<String>::new())
            .build()
            .unwrap();
        let results = initialize_workspace(&sb, &config);
        assert!(results.iter().any(|r| !r.success));
        assert!(!outside.path().join("logs").exists());
    }
}
