//! Integration tests for media-files-manager.
//!
//! Every test builds its own sandbox on a fresh temporary directory, so they
//! never touch the process working directory and can run in parallel.
//!
//! Run with:
//!   cargo test --test integration -- --nocapture

use media_files_manager::{
    initialize_workspace, parse_duration_seconds, parse_page_bounds, parse_page_selector,
    parse_page_selector_for, remove_files, rename_all, ActivityLog, HasPath, LogCategory, ManagerConfig, MfmError,
    NoopProgressCallback, OperationResult, Sandbox,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn workspace() -> (TempDir, Sandbox, ManagerConfig) {
    let dir = TempDir::new().unwrap();
    let sandbox = Sandbox::new(dir.path()).unwrap();
    let config = ManagerConfig::builder().root(dir.path()).build().unwrap();
    (dir, sandbox, config)
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"x").unwrap();
}

// ── Path resolution ──────────────────────────────────────────────────────────

#[test]
fn resolved_paths_never_collide_with_existing_files() {
    let (_d, sb, _) = workspace();
    let out = sb.root().join("exports");
    let resolver = sb.resolver();

    for _ in 0..4 {
        let next = resolver.sanitize_and_deduplicate("exports/report.pdf");
        assert!(!next.exists(), "{next} already exists");
        touch(next.as_ref());
    }

    let mut names: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["report(1).pdf", "report(2).pdf", "report(3).pdf", "report.pdf"]
    );
}

#[test]
fn resolved_name_is_sanitized_and_keeps_directory() {
    let (_d, sb, _) = workspace();
    let handle = sb
        .resolver()
        .sanitize_and_deduplicate("clips/My <best> clip?.mp4");
    assert_eq!(handle.file_name(), Some("My best clip.mp4"));
    assert_eq!(handle.dir(), sb.root().join("clips"));
    assert_eq!(handle.extension(), Some("mp4"));
}

// ── Sandbox ──────────────────────────────────────────────────────────────────

#[test]
fn sibling_directory_sharing_root_prefix_is_restricted() {
    let parent = TempDir::new().unwrap();
    let root = parent.path().join("app");
    let evil = parent.path().join("app-evil");
    fs::create_dir_all(&root).unwrap();
    fs::create_dir_all(&evil).unwrap();
    let victim = evil.join("keep.txt");
    touch(&victim);

    let sb = Sandbox::new(&root).unwrap();
    assert!(!sb.make_directory(evil.join("new")));
    assert!(!evil.join("new").exists());

    let r = sb.remove_file(&victim);
    assert!(!r.success);
    assert_eq!(r.error.as_deref(), Some("Restrictions"));
    assert!(victim.exists());
}

#[test]
fn dot_dot_segments_cannot_leave_the_sandbox() {
    let parent = TempDir::new().unwrap();
    let root = parent.path().join("root");
    fs::create_dir_all(&root).unwrap();
    let outside = parent.path().join("outside.txt");
    touch(&outside);

    let sb = Sandbox::new(&root).unwrap();
    let r = sb.remove_file("../outside.txt");
    assert_eq!(r.error.as_deref(), Some("Restrictions"));
    assert!(outside.exists());

    assert!(!sb.make_directory("a/../../escaped"));
    assert!(!parent.path().join("escaped").exists());
}

#[test]
fn make_directory_is_idempotent_and_reports_location() {
    let (_d, sb, _) = workspace();
    let first = sb.try_make_directory("Media Files Manager/Downloads").unwrap();
    let second = sb.try_make_directory("Media Files Manager/Downloads").unwrap();
    assert_eq!(first, second);
    assert!(first.is_dir());
    assert!(sb.make_directory("."));
}

#[test]
fn names_that_sanitize_to_dots_stay_in_place() {
    let (_d, sb, _) = workspace();
    fs::create_dir(sb.root().join("exports")).unwrap();

    let handle = sb.resolver().sanitize_and_deduplicate("exports/..:");
    assert_eq!(handle.file_name(), Some("untitled"));
    assert_eq!(handle.dir(), sb.root().join("exports"));

    let made = sb.try_make_directory("..:").unwrap();
    assert_eq!(made, sb.root());
    assert!(!sb.root().join("..:").exists());
}

#[test]
fn remove_checks_existence_before_restriction() {
    let (_d, sb, _) = workspace();
    let outside = TempDir::new().unwrap();

    // Missing outside the root: existence is reported first.
    let r = sb.remove_file(outside.path().join("nothing.txt"));
    assert_eq!(
        r.error.as_deref(),
        Some("Object is not a file or doesn't exist")
    );

    let err = sb.try_remove_file("missing.txt").unwrap_err();
    assert!(matches!(err, MfmError::NotFound { .. }));
}

// ── Batch operations ─────────────────────────────────────────────────────────

#[test]
fn batch_remove_reports_each_path() {
    let (_d, sb, _) = workspace();
    touch(&sb.root().join("a.png"));
    touch(&sb.root().join("b.png"));

    let results = remove_files(&sb, &["a.png", "b.png", "c.png"], &NoopProgressCallback);
    assert_eq!(results.len(), 3);
    assert!(results[0].success && results[1].success);
    assert!(!results[2].success);
    assert_eq!(results[2].subject, "c.png");
}

#[test]
fn rename_all_inside_nested_folder() {
    let (_d, sb, _) = workspace();
    touch(&sb.root().join("photos/IMG_001.jpg"));
    touch(&sb.root().join("photos/IMG_002.jpg"));
    touch(&sb.root().join("photos/readme.txt"));

    let r = rename_all(&sb, "photos", "IMG_", "trip-", &NoopProgressCallback);
    assert!(r.success, "{r:?}");
    assert_eq!(r.renamed.len(), 2);
    assert!(sb.root().join("photos/trip-001.jpg").exists());
    assert!(sb.root().join("photos/readme.txt").exists());
}

// ── Input parsing ────────────────────────────────────────────────────────────

#[test]
fn page_bounds_clamp_and_order() {
    assert_eq!(parse_page_bounds(10, "3", "50").unwrap(), (3, 10));
    assert_eq!(parse_page_bounds(10, "7", "3").unwrap(), (3, 7));
    assert!(parse_page_bounds(10, "x", "3").is_err());
    assert_eq!(
        parse_page_bounds(10, "3", "99999999999999999999999").unwrap(),
        (3, 10)
    );
}

#[test]
fn page_selector_shapes() {
    assert_eq!(parse_page_selector("5").unwrap(), vec![4]);
    assert_eq!(parse_page_selector("12").unwrap(), vec![11]);
    assert_eq!(parse_page_selector("1,3,3,5").unwrap(), vec![0, 2, 4]);
    assert_eq!(parse_page_selector("2-4").unwrap(), vec![1, 2, 3]);
    assert!(parse_page_selector("1,,2").is_err());
    assert!(parse_page_selector("5-2").is_err());
    assert!(parse_page_selector("1-18446744073709551615").is_err());
    assert_eq!(
        parse_page_selector_for(4, "2-18446744073709551615").unwrap(),
        vec![1, 2, 3]
    );
}

#[test]
fn durations_in_every_shape() {
    assert_eq!(parse_duration_seconds("10", "25").unwrap(), "15");
    assert_eq!(parse_duration_seconds("01:00", "02:30").unwrap(), "90");
    assert_eq!(
        parse_duration_seconds("00:59:00", "01:01:00").unwrap(),
        "120"
    );
    assert!(parse_duration_seconds("01:00", "1:00:00").is_err());
    assert!(parse_duration_seconds("aa", "10").is_err());
}

// ── Workspace and history ────────────────────────────────────────────────────

#[test]
fn initialized_workspace_records_history() {
    let (_d, sb, config) = workspace();
    let results = initialize_workspace(&sb, &config);
    assert!(results.iter().all(|r| r.success), "{results:?}");
    assert!(sb.root().join("Media Files Manager/Downloads").is_dir());

    let log = ActivityLog::for_config(&sb, &config);
    for category in LogCategory::ALL {
        assert!(log.path_for(category).is_file());
    }

    touch(&sb.root().join("old.pdf"));
    let removed = sb.remove_file("old.pdf");
    log.write(LogCategory::Main, &removed).unwrap();

    let history: Vec<OperationResult> = log.read(LogCategory::Main).unwrap();
    assert_eq!(history, vec![removed]);
    assert_eq!(history[0].message.as_deref(), Some("File removed permanently"));
}
