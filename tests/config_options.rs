use std::error::Error;
use std::fs;

use tempfile::tempdir;

use assetpipe::config::{load_and_validate, ConfigFile, OutputStyle};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn empty_config_falls_back_to_defaults() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Assetpipe.toml");
    fs::write(&path, "")?;

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.options.output_style, "compact");
    assert_eq!(cfg.options.image_quality, 75);
    assert_eq!(cfg.options.autoprefix_targets, vec!["last 3 versions"]);
    assert_eq!(cfg.paths.source_dir, "dist");
    assert_eq!(cfg.paths.build_dir, "build");
    assert_eq!(
        cfg.options.effective_output_style(),
        OutputStyle::Compact
    );
    Ok(())
}

#[test]
fn options_and_paths_are_read_from_toml() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Assetpipe.toml");
    fs::write(
        &path,
        r#"
[options]
output_style = "expanded"
image_quality = 90
autoprefix_targets = ["last 2 versions", "not dead"]

[paths]
source_dir = "assets"
build_dir = "public"
"#,
    )?;

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.options.effective_output_style(), OutputStyle::Expanded);
    assert_eq!(cfg.options.image_quality, 90);
    assert_eq!(
        cfg.options.autoprefix_targets,
        vec!["last 2 versions", "not dead"]
    );
    assert_eq!(cfg.paths.source_dir, "assets");
    assert_eq!(cfg.paths.build_dir, "public");
    Ok(())
}

#[test]
fn out_of_range_quality_is_rejected() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Assetpipe.toml");
    fs::write(&path, "[options]\nimage_quality = 101\n")?;

    let err = load_and_validate(&path).unwrap_err();
    assert!(err.to_string().contains("image_quality"));
    Ok(())
}

#[test]
fn unknown_output_style_is_rejected() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Assetpipe.toml");
    fs::write(&path, "[options]\noutput_style = \"fancy\"\n")?;

    assert!(load_and_validate(&path).is_err());
    Ok(())
}

#[test]
fn empty_directory_roots_are_rejected() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Assetpipe.toml");
    fs::write(&path, "[paths]\nsource_dir = \"\"\n")?;

    let err = load_and_validate(&path).unwrap_err();
    assert!(err.to_string().contains("source_dir"));
    Ok(())
}

#[test]
fn default_config_matches_the_documented_layout() {
    let cfg = ConfigFile::default();
    assert_eq!(cfg.paths.pages_dir, "dist/pages");
    assert_eq!(cfg.paths.http_port, 8080);
    assert_eq!(cfg.paths.reload_port, 35729);
}
