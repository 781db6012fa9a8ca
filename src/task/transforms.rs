// src/task/transforms.rs

//! The transform steps the pipeline definitions are built from.
//!
//! Glue steps ([`Concat`], [`RenameExt`], [`Flatten`], [`Clean`]) are
//! implemented here directly. Everything that needs real asset knowledge
//! goes through [`Pipe`] or [`Combine`], which hand the bytes to an
//! external tool and take whatever comes back.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::errors::{FilesystemError, TransformError};
use crate::task::transform::{Blob, Transform};

/// Fan-in: join all input contents into a single named blob.
///
/// Inputs are joined in set order with a newline between files. An empty
/// input set produces an empty output set, not an empty file.
pub struct Concat {
    output: String,
}

impl Concat {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl Transform for Concat {
    fn name(&self) -> &str {
        "concat"
    }

    fn apply(&self, inputs: Vec<Blob>) -> Result<Vec<Blob>, TransformError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let mut joined = Vec::new();
        for (i, blob) in inputs.iter().enumerate() {
            if i > 0 {
                joined.push(b'\n');
            }
            joined.extend_from_slice(&blob.contents);
        }

        debug!(output = %self.output, files = inputs.len(), "concatenated");
        Ok(vec![Blob::synthetic(&self.output, joined)])
    }
}

/// Per-file extension rewrite (e.g. `.ttf` -> `.woff2`).
pub struct RenameExt {
    ext: String,
}

impl RenameExt {
    pub fn new(ext: impl Into<String>) -> Self {
        Self { ext: ext.into() }
    }
}

impl Transform for RenameExt {
    fn name(&self) -> &str {
        "rename-ext"
    }

    fn apply(&self, inputs: Vec<Blob>) -> Result<Vec<Blob>, TransformError> {
        Ok(inputs
            .into_iter()
            .map(|mut blob| {
                blob.rel.set_extension(&self.ext);
                blob
            })
            .collect())
    }
}

/// Drop directory structure: every blob is renamed to its bare file name,
/// so it lands at the output directory root.
pub struct Flatten;

impl Transform for Flatten {
    fn name(&self) -> &str {
        "flatten"
    }

    fn apply(&self, inputs: Vec<Blob>) -> Result<Vec<Blob>, TransformError> {
        Ok(inputs
            .into_iter()
            .map(|mut blob| {
                if let Some(name) = blob.rel.file_name() {
                    blob.rel = PathBuf::from(name);
                }
                blob
            })
            .collect())
    }
}

/// Delete every input file from disk; produces nothing.
///
/// Only blobs with an on-disk origin are deleted; a file that vanished
/// between resolve and delete is already gone and not an error.
pub struct Clean;

impl Transform for Clean {
    fn name(&self) -> &str {
        "clean"
    }

    fn apply(&self, inputs: Vec<Blob>) -> Result<Vec<Blob>, TransformError> {
        for blob in &inputs {
            let Some(origin) = &blob.origin else {
                continue;
            };
            match fs::remove_file(origin) {
                Ok(()) => debug!(path = %origin.display(), "removed"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(FilesystemError::new(origin, err).into()),
            }
        }
        Ok(Vec::new())
    }
}

/// Per-file external command: each blob's contents go to the tool's stdin,
/// stdout becomes the new contents. Optionally rewrites the extension for
/// format conversions.
pub struct Pipe {
    step: String,
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    ext: Option<String>,
}

impl Pipe {
    pub fn new(
        step: impl Into<String>,
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            step: step.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: Vec::new(),
            ext: None,
        }
    }

    /// Extra environment for the tool (e.g. `BROWSERSLIST` for the
    /// vendor-prefixer).
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Extension written by the tool, when it differs from the input's.
    pub fn ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }
}

impl Transform for Pipe {
    fn name(&self) -> &str {
        &self.step
    }

    fn apply(&self, inputs: Vec<Blob>) -> Result<Vec<Blob>, TransformError> {
        let mut out = Vec::with_capacity(inputs.len());

        for mut blob in inputs {
            debug!(step = %self.step, file = %blob.rel.display(), "piping through external tool");
            blob.contents = run_command(
                &self.program,
                &self.args,
                &[],
                &self.env,
                Some(&blob.contents),
            )?;
            if let Some(ext) = &self.ext {
                blob.rel.set_extension(ext);
            }
            blob.origin = None;
            out.push(blob);
        }

        Ok(out)
    }
}

/// Fan-in external command: the tool gets every input's on-disk path as a
/// trailing argument and emits the combined result on stdout, which becomes
/// a single named blob (the sprite generator shape).
pub struct Combine {
    step: String,
    program: String,
    args: Vec<String>,
    output: String,
}

impl Combine {
    pub fn new(
        step: impl Into<String>,
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            step: step.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            output: output.into(),
        }
    }
}

impl Transform for Combine {
    fn name(&self) -> &str {
        &self.step
    }

    fn apply(&self, inputs: Vec<Blob>) -> Result<Vec<Blob>, TransformError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::with_capacity(inputs.len());
        for blob in &inputs {
            match &blob.origin {
                Some(origin) => paths.push(origin.to_string_lossy().into_owned()),
                None => {
                    return Err(TransformError::MalformedInput {
                        path: blob.rel.clone(),
                        reason: "combine step needs on-disk inputs".into(),
                    });
                }
            }
        }

        let combined = run_command(&self.program, &self.args, &paths, &[], None)?;
        Ok(vec![Blob::synthetic(&self.output, combined)])
    }
}

/// Spawn an external tool, optionally feeding stdin, and return its stdout.
///
/// Exit status maps straight onto the error taxonomy: spawn failure,
/// non-zero exit (stderr is logged, not propagated).
fn run_command(
    program: &str,
    args: &[String],
    trailing: &[String],
    env: &[(String, String)],
    stdin: Option<&[u8]>,
) -> Result<Vec<u8>, TransformError> {
    let command_str = display_command(program, args, trailing);

    let mut cmd = Command::new(program);
    cmd.args(args)
        .args(trailing)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env {
        cmd.env(key, value);
    }

    let mut child = cmd.spawn().map_err(|source| TransformError::CommandSpawn {
        command: command_str.clone(),
        source,
    })?;

    // Feed stdin from a separate thread so a tool that floods stdout before
    // draining stdin cannot deadlock us. A tool that never reads stdin
    // closes the pipe; that is its business, not an error.
    let writer = match (stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => {
            let input = input.to_vec();
            Some(std::thread::spawn(move || {
                if let Err(err) = pipe.write_all(&input) {
                    if err.kind() != io::ErrorKind::BrokenPipe {
                        warn!(error = %err, "failed writing to child stdin");
                    }
                }
            }))
        }
        _ => None,
    };

    let mut stdout = Vec::new();
    if let Some(mut pipe) = child.stdout.take() {
        pipe.read_to_end(&mut stdout)
            .map_err(|err| FilesystemError::new(PathBuf::from(program), err))?;
    }

    let mut stderr = Vec::new();
    if let Some(mut pipe) = child.stderr.take() {
        let _ = pipe.read_to_end(&mut stderr);
    }

    let status = child
        .wait()
        .map_err(|err| FilesystemError::new(PathBuf::from(program), err))?;

    if let Some(writer) = writer {
        let _ = writer.join();
    }

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        if !stderr.is_empty() {
            warn!(
                command = %command_str,
                code,
                stderr = %String::from_utf8_lossy(&stderr).trim_end(),
                "external tool failed"
            );
        }
        return Err(TransformError::CommandFailed {
            command: command_str,
            code,
        });
    }

    Ok(stdout)
}

fn display_command(program: &str, args: &[String], trailing: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().cloned());
    parts.extend(trailing.iter().cloned());
    parts.join(" ")
}
