// src/task/mod.rs

//! Tasks and the transform steps they are made of.
//!
//! A [`Task`] is a named, immutable description: input patterns, an ordered
//! chain of [`Transform`] steps, and an output directory. Running it
//! resolves the inputs, optionally narrows them to the stale subset, pushes
//! the set through the chain, and writes whatever comes out the far end.
//!
//! The actual asset work (SCSS compilation, minification, image and font
//! codecs) is delegated to external tools behind the [`Transform`] trait;
//! this module only ships the glue steps it can express without parser or
//! codec logic, plus the generic external-command steps.

pub mod task;
pub mod transform;
pub mod transforms;

pub use task::Task;
pub use transform::{Blob, Transform};
pub use transforms::{Clean, Combine, Concat, Flatten, Pipe, RenameExt};
