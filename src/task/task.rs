// src/task/task.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::errors::{FilesystemError, TaskError, TransformError};
use crate::fileset::{filter_newer, MatchedFile, PatternSet};
use crate::task::transform::{Blob, Transform};

/// A named unit of work: input patterns, an ordered transform chain, and an
/// output directory. Immutable once registered; the graph shares tasks
/// through `Arc`.
pub struct Task {
    pub name: String,
    /// Base directory (project-root-relative) the inputs are rebased
    /// against when writing outputs.
    pub base: PathBuf,
    pub inputs: PatternSet,
    pub steps: Vec<Arc<dyn Transform>>,
    /// Output directory, project-root-relative.
    pub output_dir: PathBuf,
    /// When set, inputs are narrowed to those newer than their
    /// counterpart under `output_dir` before the chain runs.
    pub incremental: bool,
    /// Extension of the final outputs when a step rewrites it; used only
    /// to compute incremental counterpart paths.
    pub target_ext: Option<String>,
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("inputs", &self.inputs)
            .field("steps", &self.steps.len())
            .field("output_dir", &self.output_dir)
            .field("incremental", &self.incremental)
            .field("target_ext", &self.target_ext)
            .finish()
    }
}

impl Task {
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        base: impl Into<PathBuf>,
        inputs: &[S],
        steps: Vec<Arc<dyn Transform>>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            base: base.into(),
            inputs: PatternSet::compile(inputs)?,
            steps,
            output_dir: output_dir.into(),
            incremental: false,
            target_ext: None,
        })
    }

    pub fn incremental(mut self) -> Self {
        self.incremental = true;
        self
    }

    pub fn target_ext(mut self, ext: impl Into<String>) -> Self {
        self.target_ext = Some(ext.into());
        self
    }

    /// Execute the task against a project root.
    ///
    /// Resolve inputs, narrow to the stale subset when the task is
    /// incremental, run the chain, write the results beneath `output_dir`
    /// preserving base-relative structure. Returns the written paths.
    ///
    /// Any failing phase aborts with a [`TaskError`]; outputs already
    /// written by earlier completed runs or steps stay in place. There is
    /// no rollback: tasks own disjoint output paths, so a partial tree is
    /// simply re-covered by the next successful run.
    pub fn run(&self, root: &Path) -> Result<Vec<PathBuf>, TaskError> {
        let matched = self
            .inputs
            .resolve(root, &self.base)
            .map_err(|err| self.err("resolve", err.into()))?;

        let matched = if self.incremental {
            let out_dir = root.join(&self.output_dir);
            filter_newer(matched, &out_dir, self.target_ext.as_deref())
                .map_err(|err| self.err("filter", err.into()))?
        } else {
            matched
        };

        if matched.is_empty() {
            debug!(task = %self.name, "nothing to do");
            return Ok(Vec::new());
        }

        info!(task = %self.name, inputs = matched.len(), "running task");

        let mut blobs = self
            .load(&matched)
            .map_err(|err| self.err("read", err.into()))?;

        for step in &self.steps {
            blobs = step
                .apply(blobs)
                .map_err(|err| self.err(step.name(), err))?;
        }

        let written = self
            .write(root, blobs)
            .map_err(|err| self.err("write", err.into()))?;

        info!(task = %self.name, outputs = written.len(), "task finished");
        Ok(written)
    }

    fn load(&self, matched: &[MatchedFile]) -> Result<Vec<Blob>, FilesystemError> {
        let mut blobs = Vec::with_capacity(matched.len());
        for file in matched {
            let contents =
                fs::read(&file.abs).map_err(|err| FilesystemError::new(&file.abs, err))?;
            blobs.push(Blob {
                rel: file.rel.clone(),
                origin: Some(file.abs.clone()),
                contents,
            });
        }
        Ok(blobs)
    }

    fn write(&self, root: &Path, blobs: Vec<Blob>) -> Result<Vec<PathBuf>, FilesystemError> {
        let out_dir = root.join(&self.output_dir);
        let mut written = Vec::with_capacity(blobs.len());

        for blob in blobs {
            let dest = out_dir.join(&blob.rel);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|err| FilesystemError::new(parent, err))?;
            }
            fs::write(&dest, &blob.contents).map_err(|err| FilesystemError::new(&dest, err))?;
            debug!(task = %self.name, path = %dest.display(), "wrote output");
            written.push(dest);
        }

        Ok(written)
    }

    fn err(&self, step: &str, cause: TransformError) -> TaskError {
        TaskError::new(&self.name, step, cause)
    }
}
