// src/fileset/mod.rs

//! Input file resolution.
//!
//! - [`matcher`] turns ordered glob patterns (with `!` exclusions) into a
//!   concrete file list, each entry keeping its base-relative path for
//!   output rebasing.
//! - [`incremental`] narrows a resolved set to the inputs that are newer
//!   than their corresponding outputs.
//!
//! Neither module knows about tasks or the graph; they only answer
//! "which files" questions.

pub mod incremental;
pub mod matcher;

pub use incremental::filter_newer;
pub use matcher::{MatchedFile, PatternSet};
