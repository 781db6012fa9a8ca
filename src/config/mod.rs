// src/config/mod.rs

//! Configuration loading and validation for assetpipe.
//!
//! The task definitions themselves are compiled in (`crate::pipelines`);
//! the config file only tunes the recognized options (output style, image
//! quality, vendor-prefix targets) and the directory/port layout.
//!
//! - Define the TOML-backed data model (`model.rs`).
//! - Load an optional config file from disk (`loader.rs`).
//! - Validate option ranges (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, OptionsSection, OutputStyle, PathsSection};
pub use validate::validate_config;
