use std::error::Error;
use std::fs;
use std::path::Path;

use tempfile::tempdir;

use assetpipe::fileset::PatternSet;

type TestResult = Result<(), Box<dyn Error>>;

fn touch(root: &Path, rel: &str, contents: &str) -> TestResult {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn rels(root: &Path, set: &PatternSet, base: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let files = set.resolve(root, Path::new(base))?;
    Ok(files
        .iter()
        .map(|f| f.rel.to_string_lossy().replace('\\', "/"))
        .collect())
}

#[test]
fn trailing_exclusion_always_wins() -> TestResult {
    let dir = tempdir()?;
    touch(dir.path(), "dist/js/a.js", "const a = 1;")?;
    touch(dir.path(), "dist/js/b.js", "const b = 2;")?;
    touch(dir.path(), "dist/js/main.min.js", "stale")?;

    let set = PatternSet::compile(&["dist/js/*.js", "!dist/js/main.min.js"])?;
    let names = rels(dir.path(), &set, "dist/js")?;

    assert_eq!(names, vec!["a.js", "b.js"]);
    Ok(())
}

#[test]
fn later_positive_pattern_reincludes_an_excluded_file() -> TestResult {
    let dir = tempdir()?;
    touch(dir.path(), "dist/img/photo.png", "png")?;
    touch(dir.path(), "dist/img/icons/star.svg", "svg")?;
    touch(dir.path(), "dist/img/sprite.svg", "sprite")?;

    let set = PatternSet::compile(&[
        "dist/img/**",
        "!dist/img/**/*.svg",
        "dist/img/sprite.svg",
    ])?;
    let mut names = rels(dir.path(), &set, "dist/img")?;
    names.sort();

    assert_eq!(names, vec!["photo.png", "sprite.svg"]);
    Ok(())
}

#[test]
fn pattern_matching_nothing_is_not_an_error() -> TestResult {
    let dir = tempdir()?;
    touch(dir.path(), "dist/js/a.js", "x")?;

    let set = PatternSet::compile(&["dist/js/*.ts", "dist/nothing/**"])?;
    let names = rels(dir.path(), &set, "dist")?;

    assert!(names.is_empty());
    Ok(())
}

#[test]
fn single_star_stays_within_one_directory() -> TestResult {
    let dir = tempdir()?;
    touch(dir.path(), "dist/js/a.js", "x")?;
    touch(dir.path(), "dist/js/vendor/lib.js", "y")?;

    let shallow = PatternSet::compile(&["dist/js/*.js"])?;
    assert_eq!(rels(dir.path(), &shallow, "dist/js")?, vec!["a.js"]);

    let deep = PatternSet::compile(&["dist/js/**/*.js"])?;
    let mut names = rels(dir.path(), &deep, "dist/js")?;
    names.sort();
    assert_eq!(names, vec!["a.js", "vendor/lib.js"]);

    Ok(())
}

#[test]
fn output_order_follows_pattern_order() -> TestResult {
    let dir = tempdir()?;
    touch(dir.path(), "dist/a.css", "a")?;
    touch(dir.path(), "dist/z.js", "z")?;

    let set = PatternSet::compile(&["dist/*.js", "dist/*.css"])?;
    let names = rels(dir.path(), &set, "dist")?;

    assert_eq!(names, vec!["z.js", "a.css"]);
    Ok(())
}

#[test]
fn single_path_matching_applies_ops_in_order() -> TestResult {
    let set = PatternSet::compile(&["dist/js/*.js", "!dist/js/main.min.js"])?;

    assert!(set.matches("dist/js/app.js"));
    assert!(!set.matches("dist/js/main.min.js"));
    assert!(!set.matches("dist/css/style.css"));

    Ok(())
}
