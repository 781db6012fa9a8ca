// src/fileset/incremental.rs

//! Mtime-based incremental narrowing.
//!
//! For each input, the candidate output is the input's base-relative path
//! rebased under the task's output directory (with the extension swapped
//! when the transform chain declares a different one). An input is retained
//! iff the candidate is missing or strictly older than the input. Equal
//! mtimes count as up to date.
//!
//! The policy is deliberately conservative: mtimes only, never content
//! hashing, so clock skew or touched-but-unchanged files cause spurious
//! reprocessing but never a missed rebuild.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::errors::FilesystemError;
use crate::fileset::matcher::MatchedFile;

/// Keep the inputs that need reprocessing against `output_dir`.
///
/// `target_ext` is the extension the chain's final step writes, if it
/// differs from the source extension.
pub fn filter_newer(
    inputs: Vec<MatchedFile>,
    output_dir: &Path,
    target_ext: Option<&str>,
) -> Result<Vec<MatchedFile>, FilesystemError> {
    let mut stale = Vec::with_capacity(inputs.len());

    for input in inputs {
        let mut candidate = output_dir.join(&input.rel);
        if let Some(ext) = target_ext {
            candidate.set_extension(ext);
        }

        let out_meta = match fs::metadata(&candidate) {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                // Cold start: no output counterpart yet.
                stale.push(input);
                continue;
            }
            Err(err) => return Err(FilesystemError::new(candidate, err)),
        };

        let in_meta =
            fs::metadata(&input.abs).map_err(|err| FilesystemError::new(&input.abs, err))?;

        let in_mtime = in_meta
            .modified()
            .map_err(|err| FilesystemError::new(&input.abs, err))?;
        let out_mtime = out_meta
            .modified()
            .map_err(|err| FilesystemError::new(&candidate, err))?;

        if in_mtime > out_mtime {
            stale.push(input);
        } else {
            debug!(input = %input.rel.display(), "up to date; skipping");
        }
    }

    Ok(stale)
}
