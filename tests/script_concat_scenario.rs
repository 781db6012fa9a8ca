use std::error::Error;
use std::fs;
use std::sync::Arc;

use tempfile::tempdir;

use assetpipe::task::{Concat, Task, Transform};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn script_task_rebuilds_the_bundle_from_its_sources_only() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("dist/js"))?;
    fs::write(dir.path().join("dist/js/a.js"), "const a = 1;")?;
    fs::write(dir.path().join("dist/js/b.js"), "const b = 2;")?;
    fs::write(dir.path().join("dist/js/main.min.js"), "OLD BUNDLE")?;

    let steps: Vec<Arc<dyn Transform>> = vec![Arc::new(Concat::new("main.min.js"))];
    let task = Task::new(
        "scripts",
        "dist/js",
        &["dist/js/*.js", "!dist/js/main.min.js"],
        steps,
        "dist/js",
    )?;

    let written = task.run(dir.path())?;
    assert_eq!(written, vec![dir.path().join("dist/js/main.min.js")]);

    let bundle = fs::read_to_string(dir.path().join("dist/js/main.min.js"))?;
    assert!(bundle.contains("const a = 1;"));
    assert!(bundle.contains("const b = 2;"));
    assert!(
        !bundle.contains("OLD BUNDLE"),
        "previous bundle must never leak into the new one"
    );
    assert_eq!(bundle, "const a = 1;\nconst b = 2;");

    Ok(())
}

#[test]
fn concat_of_nothing_produces_no_output_file() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("dist/js"))?;

    let steps: Vec<Arc<dyn Transform>> = vec![Arc::new(Concat::new("main.min.js"))];
    let task = Task::new(
        "scripts",
        "dist/js",
        &["dist/js/*.js", "!dist/js/main.min.js"],
        steps,
        "dist/js",
    )?;

    let written = task.run(dir.path())?;
    assert!(written.is_empty());
    assert!(!dir.path().join("dist/js/main.min.js").exists());

    Ok(())
}
