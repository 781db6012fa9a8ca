use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use tempfile::tempdir;

use assetpipe::config::ConfigFile;
use assetpipe::graph::{execute, RunContext};
use assetpipe::pipelines;

type TestResult = Result<(), Box<dyn Error>>;

fn touch(root: &Path, rel: &str, contents: &str) -> TestResult {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn snapshot(dir: &Path) -> Result<BTreeMap<String, Vec<u8>>, Box<dyn Error>> {
    let mut out = BTreeMap::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        let entries = match fs::read_dir(&d) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => return Err(err.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path
                    .strip_prefix(dir)?
                    .to_string_lossy()
                    .replace('\\', "/");
                out.insert(rel, fs::read(&path)?);
            }
        }
    }
    Ok(out)
}

fn seed_dist(root: &Path) -> TestResult {
    touch(root, "dist/css/style.min.css", "body{margin:0}")?;
    touch(root, "dist/js/main.min.js", "const a=1;")?;
    touch(root, "dist/images/build/photo.png", "png-bytes")?;
    touch(root, "dist/images/build/icons/star.svg", "<svg>star</svg>")?;
    touch(root, "dist/images/build/sprite.svg", "<svg>sprite</svg>")?;
    touch(root, "dist/fonts/fonts-build/body.woff2", "woff2-bytes")?;
    touch(root, "dist/pages/index.html", "<html></html>")?;
    Ok(())
}

#[tokio::test]
async fn running_build_twice_yields_byte_identical_trees() -> TestResult {
    let dir = tempdir()?;
    seed_dist(dir.path())?;

    let registry = pipelines::build(&ConfigFile::default())?;
    let node = pipelines::select(&registry, "build")?;
    let ctx = RunContext::new(dir.path());

    execute(node, &ctx).await?;
    let first = snapshot(&dir.path().join("build"))?;

    execute(node, &ctx).await?;
    let second = snapshot(&dir.path().join("build"))?;

    assert!(!first.is_empty());
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn collect_keeps_the_sprite_but_drops_loose_svgs() -> TestResult {
    let dir = tempdir()?;
    seed_dist(dir.path())?;

    let registry = pipelines::build(&ConfigFile::default())?;
    let node = pipelines::select(&registry, "build")?;
    let ctx = RunContext::new(dir.path());
    execute(node, &ctx).await?;

    let tree = snapshot(&dir.path().join("build"))?;
    let paths: Vec<&str> = tree.keys().map(|s| s.as_str()).collect();

    assert!(paths.contains(&"css/style.min.css"));
    assert!(paths.contains(&"js/main.min.js"));
    assert!(paths.contains(&"images/build/photo.png"));
    assert!(paths.contains(&"images/build/sprite.svg"));
    assert!(paths.contains(&"fonts/fonts-build/body.woff2"));
    assert!(paths.contains(&"pages/index.html"));
    assert!(
        !paths.contains(&"images/build/icons/star.svg"),
        "loose icon sources must not ship in the final tree"
    );
    Ok(())
}

#[tokio::test]
async fn clean_removes_previous_artifacts() -> TestResult {
    let dir = tempdir()?;
    seed_dist(dir.path())?;
    touch(dir.path(), "build/leftover.txt", "old")?;

    let registry = pipelines::build(&ConfigFile::default())?;
    let node = pipelines::select(&registry, "build")?;
    let ctx = RunContext::new(dir.path());
    execute(node, &ctx).await?;

    assert!(!dir.path().join("build/leftover.txt").exists());
    assert!(dir.path().join("build/css/style.min.css").exists());
    Ok(())
}
