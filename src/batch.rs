//! Batch operations over folders and file lists.
//!
//! Each item gets its own [`OperationResult`]; a failing item is reported
//! and the batch moves on. The `*_async` wrappers run the same code inside
//! `tokio::task::spawn_blocking` so callers on an async runtime do not stall
//! a worker thread on filesystem calls.

use crate::error::MfmError;
use crate::fs::handle::{split_name, DirectoryHandle, HasPath};
use crate::fs::sanitize::sanitize_component;
use crate::fs::Sandbox;
use crate::output::OperationResult;
use crate::progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Operation label used on bulk-rename results.
pub const RENAME_OPERATION: &str = "Rename";

/// Remove every path in `paths` through [`Sandbox::remove_file`].
///
/// Returns one result per input path, in input order.
pub fn remove_files<P: AsRef<Path>>(
    sandbox: &Sandbox,
    paths: &[P],
    progress: &dyn BatchProgressCallback,
) -> Vec<OperationResult> {
    let total = paths.len();
    progress.on_batch_start(total);

    let mut results = Vec::with_capacity(total);
    for (i, path) in paths.iter().enumerate() {
        let index = i + 1;
        let subject = OperationResult::subject_path(path.as_ref());
        progress.on_item_start(index, total, &subject);

        let result = sandbox.remove_file(path);
        report(progress, index, total, &result);
        results.push(result);
    }

    let ok = results.iter().filter(|r| r.success).count();
    info!("Removed {}/{} files", ok, total);
    progress.on_batch_complete(total, ok);
    results
}

/// Replace `remove` with `replace` in the stem of every entry of `dir`.
///
/// Extensions are preserved and the new stem is sanitized. An entry is
/// skipped (and recorded as a failed step) if its new name would be empty
/// or is already taken. The returned result lists every `(old, new)` pair
/// that was renamed.
pub fn rename_all(
    sandbox: &Sandbox,
    dir: impl AsRef<Path>,
    remove: &str,
    replace: &str,
    progress: &dyn BatchProgressCallback,
) -> OperationResult {
    let dir = dir.as_ref();
    let subject = OperationResult::subject_path(dir);

    if remove.is_empty() {
        let e = MfmError::invalid(remove, "text to remove must not be empty");
        return OperationResult::failure(subject, RENAME_OPERATION, e.to_string());
    }
    if !sandbox.contains(dir) {
        warn!("Rename refused outside sandbox: {}", dir.display());
        return OperationResult::failure(
            subject,
            RENAME_OPERATION,
            crate::error::RESTRICTION_MESSAGE,
        );
    }

    let folder = DirectoryHandle::new(sandbox.absolute(dir));
    if !folder.is_dir() {
        return OperationResult::failure(subject, RENAME_OPERATION, "Folder doesn't exist");
    }
    let mut entries = match folder.list_dir() {
        Ok(entries) => entries,
        Err(e) => return OperationResult::failure(subject, RENAME_OPERATION, e.result_text()),
    };
    entries.sort();

    let candidates: Vec<String> = entries
        .into_iter()
        .filter(|name| split_name(Path::new(name)).0.contains(remove))
        .collect();
    let total = candidates.len();
    progress.on_batch_start(total);

    let mut renamed = Vec::new();
    let mut unchanged = 0;
    let mut failures = Vec::new();
    for (i, old_name) in candidates.iter().enumerate() {
        let index = i + 1;
        progress.on_item_start(index, total, old_name);

        match rename_entry(folder.path(), old_name, remove, replace) {
            Ok(Some(new_name)) => {
                progress.on_item_complete(index, total, old_name);
                renamed.push((old_name.clone(), new_name));
            }
            Ok(None) => {
                debug!("'{}' keeps its name", old_name);
                progress.on_item_complete(index, total, old_name);
                unchanged += 1;
            }
            Err(e) => {
                let text = e.to_string();
                warn!("Skipping rename of '{}': {}", old_name, text);
                progress.on_item_error(index, total, old_name, &text);
                failures.push(OperationResult::failure(
                    old_name.clone(),
                    RENAME_OPERATION,
                    text,
                ));
            }
        }
    }

    progress.on_batch_complete(total, renamed.len() + unchanged);
    info!(
        "Renamed {}/{} entries in {}",
        renamed.len(),
        total,
        folder.path().display()
    );

    let message = format!("Process done successfully ({} renamed)", renamed.len());
    let mut result = OperationResult::success(subject, RENAME_OPERATION, message)
        .with_save_location(folder.path())
        .with_renamed(renamed);
    result.steps = failures;
    result
}

/// Rename one entry; `Ok(None)` when the new name equals the old one.
fn rename_entry(
    dir: &Path,
    old_name: &str,
    remove: &str,
    replace: &str,
) -> Result<Option<String>, MfmError> {
    let (stem, ext) = split_name(Path::new(old_name));
    let new_stem = sanitize_component(&stem.replace(remove, replace))
        .ok_or_else(|| MfmError::invalid(old_name, "new name would be empty"))?;
    let new_name = match ext {
        Some(ext) => format!("{new_stem}.{ext}"),
        None => new_stem,
    };
    if new_name == old_name {
        return Ok(None);
    }

    let from = dir.join(old_name);
    let to = dir.join(&new_name);
    if to.exists() {
        return Err(MfmError::invalid(
            old_name,
            format!("'{new_name}' already exists"),
        ));
    }
    fs::rename(&from, &to).map_err(|e| MfmError::io(&from, e))?;
    debug!("Renamed '{}' -> '{}'", old_name, new_name);
    Ok(Some(new_name))
}

fn report(progress: &dyn BatchProgressCallback, index: usize, total: usize, r: &OperationResult) {
    if r.success {
        progress.on_item_complete(index, total, &r.subject);
    } else {
        progress.on_item_error(index, total, &r.subject, r.error.as_deref().unwrap_or(""));
    }
}

fn callback_or_noop(progress: Option<ProgressCallback>) -> ProgressCallback {
    progress.unwrap_or_else(|| Arc::new(NoopProgressCallback))
}

/// [`remove_files`] on a blocking worker thread.
pub async fn remove_files_async(
    sandbox: Sandbox,
    paths: Vec<PathBuf>,
    progress: Option<ProgressCallback>,
) -> Result<Vec<OperationResult>, MfmError> {
    let cb = callback_or_noop(progress);
    tokio::task::spawn_blocking(move || remove_files(&sandbox, &paths, cb.as_ref()))
        .await
        .map_err(|e| MfmError::Internal(format!("Remove task panicked: {}", e)))
}

/// [`rename_all`] on a blocking worker thread.
pub async fn rename_all_async(
    sandbox: Sandbox,
    dir: PathBuf,
    remove: String,
    replace: String,
    progress: Option<ProgressCallback>,
) -> Result<OperationResult, MfmError> {
    let cb = callback_or_noop(progress);
    tokio::task::spawn_blocking(move || rename_all(&sandbox, &dir, &remove, &replace, cb.as_ref()))
        .await
        .map_err(|e| MfmError::Internal(format!("Rename task panicked: {}", e)))
}
