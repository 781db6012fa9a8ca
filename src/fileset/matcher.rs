// src/fileset/matcher.rs

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use crate::errors::FilesystemError;

/// A file resolved from a pattern set.
///
/// `rel` is the path relative to the task's base directory; it decides
/// where the file lands when rebased under an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub abs: PathBuf,
    pub rel: PathBuf,
}

/// One compiled pattern, in declaration order.
enum PatternOp {
    Include(GlobMatcher),
    Exclude(GlobMatcher),
}

/// An ordered sequence of glob patterns with `!` exclusions.
///
/// Patterns are matched against project-root-relative paths with forward
/// slashes. An exclusion removes matches contributed by *earlier* positive
/// patterns; a later positive pattern can re-include a previously excluded
/// file (the artifact-collection globs rely on this).
pub struct PatternSet {
    ops: Vec<PatternOp>,
    raw: Vec<String>,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet").field("raw", &self.raw).finish()
    }
}

impl PatternSet {
    /// Compile an ordered pattern list. Fails fast on an invalid glob; this
    /// runs at registry construction, not per resolve.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut ops = Vec::with_capacity(patterns.len());
        let mut raw = Vec::with_capacity(patterns.len());

        for pat in patterns {
            let pat = pat.as_ref();
            raw.push(pat.to_string());

            let (negated, body) = match pat.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, pat),
            };

            // literal_separator keeps `*` within one path component; `**`
            // is the only way to cross directories.
            let matcher = GlobBuilder::new(body)
                .literal_separator(true)
                .build()
                .with_context(|| format!("invalid glob pattern: {pat}"))?
                .compile_matcher();

            ops.push(if negated {
                PatternOp::Exclude(matcher)
            } else {
                PatternOp::Include(matcher)
            });
        }

        Ok(Self { ops, raw })
    }

    /// The original pattern strings, for diagnostics and dry-run output.
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    /// Whether a root-relative path (forward slashes) is selected by this
    /// pattern set, applying includes and excludes in declaration order.
    pub fn matches(&self, rel: &str) -> bool {
        let mut selected = false;
        for op in &self.ops {
            match op {
                PatternOp::Include(m) => {
                    if m.is_match(rel) {
                        selected = true;
                    }
                }
                PatternOp::Exclude(m) => {
                    if m.is_match(rel) {
                        selected = false;
                    }
                }
            }
        }
        selected
    }

    /// Resolve the pattern set into concrete files.
    ///
    /// Files are discovered beneath `root.join(base)` and matched against
    /// their root-relative path; `MatchedFile::rel` is relative to `base`.
    /// Output order is pattern order, files sorted within each pattern.
    /// A pattern matching nothing contributes nothing; an unreadable
    /// directory is a [`FilesystemError`].
    pub fn resolve(&self, root: &Path, base: &Path) -> Result<Vec<MatchedFile>, FilesystemError> {
        let base_dir = root.join(base);
        let files = walk_files(&base_dir)?;

        // Precompute the root-relative match strings once.
        let entries: Vec<(String, &PathBuf)> = files
            .iter()
            .filter_map(|abs| {
                let rel = abs.strip_prefix(root).ok()?;
                Some((rel.to_string_lossy().replace('\\', "/"), abs))
            })
            .collect();

        let mut out: Vec<MatchedFile> = Vec::new();
        for op in &self.ops {
            match op {
                PatternOp::Include(m) => {
                    for (rel_str, abs) in &entries {
                        if m.is_match(rel_str) && !out.iter().any(|f| &f.abs == *abs) {
                            let rel = (*abs)
                                .strip_prefix(&base_dir)
                                .unwrap_or_else(|_| Path::new(rel_str))
                                .to_path_buf();
                            out.push(MatchedFile {
                                abs: (*abs).clone(),
                                rel,
                            });
                        }
                    }
                }
                PatternOp::Exclude(m) => {
                    out.retain(|f| {
                        let rel_str = f
                            .abs
                            .strip_prefix(root)
                            .map(|p| p.to_string_lossy().replace('\\', "/"))
                            .unwrap_or_default();
                        !m.is_match(&rel_str)
                    });
                }
            }
        }

        debug!(base = %base_dir.display(), matched = out.len(), "resolved pattern set");
        Ok(out)
    }
}

/// Collect every file under `dir`, sorted for deterministic resolution.
///
/// A missing directory is an empty contribution, not an error; any other
/// read failure (e.g. permission denied) aborts the resolve.
fn walk_files(dir: &Path) -> Result<Vec<PathBuf>, FilesystemError> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(d) = stack.pop() {
        let entries = match fs::read_dir(&d) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(FilesystemError::new(d, err)),
        };

        for entry in entries {
            let entry = entry.map_err(|err| FilesystemError::new(&d, err))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}
