// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! Layered the same way the pipeline is: a filesystem or transform failure
//! is wrapped into a [`TaskError`] carrying task context, and composed runs
//! surface a [`GraphError`] carrying graph position context.
//!
//! - `Series` propagates the first child error unchanged and never starts
//!   later children.
//! - `Parallel` lets every sibling run to completion, then reports the first
//!   failure plus a count.

use std::path::PathBuf;

use thiserror::Error;

/// A path could not be read, written or removed.
#[derive(Error, Debug)]
#[error("filesystem error at {path:?}")]
pub struct FilesystemError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl FilesystemError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// A single transform step failed.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// The external tool ran but exited non-zero.
    #[error("command `{command}` exited with code {code}")]
    CommandFailed { command: String, code: i32 },

    /// The external tool could not be spawned at all.
    #[error("command `{command}` could not be spawned")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A step received input it cannot operate on (e.g. a fan-in command
    /// given an in-memory blob with no on-disk origin).
    #[error("malformed input {path:?}: {reason}")]
    MalformedInput { path: PathBuf, reason: String },

    /// The blocking worker running the task died (panic or cancellation).
    #[error("task worker failed: {0}")]
    Worker(String),
}

/// A task aborted at a specific step.
///
/// `step` is the name of the failed transform, or one of the pseudo-steps
/// `resolve` / `filter` / `read` / `write` for the fixed phases around the
/// transform chain. Outputs written by steps that completed before the
/// failure are left in place; there is no rollback.
#[derive(Error, Debug)]
#[error("task '{task}' failed at step '{step}'")]
pub struct TaskError {
    pub task: String,
    pub step: String,
    #[source]
    pub cause: TransformError,
}

impl TaskError {
    pub fn new(task: impl Into<String>, step: impl Into<String>, cause: TransformError) -> Self {
        Self {
            task: task.into(),
            step: step.into(),
            cause,
        }
    }
}

/// Failure of a composed graph node.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error(transparent)]
    Task(#[from] TaskError),

    /// One or more parallel branches failed. Every sibling still ran to
    /// completion; `first` is the earliest failure in declaration order.
    #[error("{failed} of {total} parallel branches failed")]
    Parallel {
        failed: usize,
        total: usize,
        #[source]
        first: Box<GraphError>,
    },
}
