// src/config/model.rs

use std::str::FromStr;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [options]
/// output_style = "expanded"
/// image_quality = 80
/// autoprefix_targets = ["last 3 versions"]
///
/// [paths]
/// source_dir = "dist"
/// build_dir = "build"
/// ```
///
/// All sections are optional and have defaults matching the stock
/// front-end layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Transform tuning knobs from `[options]`.
    #[serde(default)]
    pub options: OptionsSection,

    /// Directory and port layout from `[paths]`.
    #[serde(default)]
    pub paths: PathsSection,
}

/// `[options]` section: the recognized transform options.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsSection {
    /// `"compact"` (minified) or `"expanded"` stylesheet output.
    #[serde(default = "default_output_style")]
    pub output_style: String,

    /// Image compression quality, 0-100.
    #[serde(default = "default_image_quality")]
    pub image_quality: u8,

    /// Browser specifiers handed to the vendor-prefixer.
    #[serde(default = "default_autoprefix_targets")]
    pub autoprefix_targets: Vec<String>,
}

fn default_output_style() -> String {
    "compact".to_string()
}

fn default_image_quality() -> u8 {
    75
}

fn default_autoprefix_targets() -> Vec<String> {
    vec!["last 3 versions".to_string()]
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            output_style: default_output_style(),
            image_quality: default_image_quality(),
            autoprefix_targets: default_autoprefix_targets(),
        }
    }
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Root of the working asset tree.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Root the `build` pipeline collects final artifacts into.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    /// Directory the dev server serves.
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Dev server port.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Preferred live-reload websocket port.
    #[serde(default = "default_reload_port")]
    pub reload_port: u16,
}

fn default_source_dir() -> String {
    "dist".to_string()
}

fn default_build_dir() -> String {
    "build".to_string()
}

fn default_pages_dir() -> String {
    "dist/pages".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_reload_port() -> u16 {
    35729
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            build_dir: default_build_dir(),
            pages_dir: default_pages_dir(),
            http_port: default_http_port(),
            reload_port: default_reload_port(),
        }
    }
}

/// Parsed stylesheet output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    Compact,
    Expanded,
}

impl OutputStyle {
    /// The style string the SCSS compiler expects.
    pub fn compiler_arg(self) -> &'static str {
        match self {
            OutputStyle::Compact => "compressed",
            OutputStyle::Expanded => "expanded",
        }
    }
}

impl FromStr for OutputStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(OutputStyle::Compact),
            "expanded" => Ok(OutputStyle::Expanded),
            other => Err(format!(
                "invalid output_style: {other} (expected \"compact\" or \"expanded\")"
            )),
        }
    }
}

impl OptionsSection {
    /// Convenience: the parsed output style. Only call after validation.
    pub fn effective_output_style(&self) -> OutputStyle {
        OutputStyle::from_str(&self.output_style).unwrap_or(OutputStyle::Compact)
    }
}
