use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::tempdir;

use assetpipe::fileset::{filter_newer, MatchedFile};

type TestResult = Result<(), Box<dyn Error>>;

fn write_with_mtime(path: &Path, contents: &str, mtime: SystemTime) -> TestResult {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    let file = fs::File::options().write(true).open(path)?;
    file.set_modified(mtime)?;
    Ok(())
}

fn input(root: &Path, rel: &str) -> MatchedFile {
    MatchedFile {
        abs: root.join(rel),
        rel: PathBuf::from(rel),
    }
}

#[test]
fn missing_output_counterpart_is_always_reprocessed() -> TestResult {
    let dir = tempdir()?;
    let now = SystemTime::now();
    write_with_mtime(&dir.path().join("logo.png"), "png", now)?;

    let kept = filter_newer(
        vec![input(dir.path(), "logo.png")],
        &dir.path().join("out"),
        None,
    )?;

    assert_eq!(kept.len(), 1);
    Ok(())
}

#[test]
fn fresh_output_is_skipped() -> TestResult {
    let dir = tempdir()?;
    let now = SystemTime::now();
    write_with_mtime(&dir.path().join("logo.png"), "png", now)?;
    write_with_mtime(
        &dir.path().join("out/logo.png"),
        "compressed",
        now + Duration::from_secs(10),
    )?;

    let kept = filter_newer(
        vec![input(dir.path(), "logo.png")],
        &dir.path().join("out"),
        None,
    )?;

    assert!(kept.is_empty());
    Ok(())
}

#[test]
fn equal_mtimes_count_as_up_to_date() -> TestResult {
    let dir = tempdir()?;
    let now = SystemTime::now();
    write_with_mtime(&dir.path().join("logo.png"), "png", now)?;
    write_with_mtime(&dir.path().join("out/logo.png"), "compressed", now)?;

    let kept = filter_newer(
        vec![input(dir.path(), "logo.png")],
        &dir.path().join("out"),
        None,
    )?;

    assert!(kept.is_empty());
    Ok(())
}

#[test]
fn stale_output_is_reprocessed() -> TestResult {
    let dir = tempdir()?;
    let now = SystemTime::now();
    write_with_mtime(&dir.path().join("logo.png"), "png", now)?;
    write_with_mtime(
        &dir.path().join("out/logo.png"),
        "compressed",
        now - Duration::from_secs(10),
    )?;

    let kept = filter_newer(
        vec![input(dir.path(), "logo.png")],
        &dir.path().join("out"),
        None,
    )?;

    assert_eq!(kept.len(), 1);
    Ok(())
}

#[test]
fn extension_rewrite_checks_the_rewritten_candidate() -> TestResult {
    let dir = tempdir()?;
    let now = SystemTime::now();
    write_with_mtime(&dir.path().join("logo.png"), "png", now)?;
    write_with_mtime(
        &dir.path().join("out/logo.webp"),
        "webp",
        now + Duration::from_secs(10),
    )?;

    // Against the rewritten name the output is fresh.
    let kept = filter_newer(
        vec![input(dir.path(), "logo.png")],
        &dir.path().join("out"),
        Some("webp"),
    )?;
    assert!(kept.is_empty());

    // Against the original name there is no counterpart at all.
    let kept = filter_newer(
        vec![input(dir.path(), "logo.png")],
        &dir.path().join("out"),
        None,
    )?;
    assert_eq!(kept.len(), 1);

    Ok(())
}
