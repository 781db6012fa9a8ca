// src/watch/bindings.rs

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::fileset::PatternSet;
use crate::graph::TaskNode;
use crate::reload::ReloadKind;

/// One watch rule: patterns, the node to run on a match, and the reload
/// signal to broadcast afterwards.
///
/// Bindings are created once at startup and never mutated. `node` is
/// optional so a binding can be reload-only (the bare page watch); a
/// changed path may match several bindings, and all of them fire.
pub struct WatchBinding {
    name: String,
    patterns: PatternSet,
    pub node: Option<Arc<TaskNode>>,
    pub reload: Option<ReloadKind>,
}

impl fmt::Debug for WatchBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchBinding")
            .field("name", &self.name)
            .field("patterns", &self.patterns)
            .field("reload", &self.reload)
            .finish_non_exhaustive()
    }
}

impl WatchBinding {
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        patterns: &[S],
        node: Option<Arc<TaskNode>>,
        reload: Option<ReloadKind>,
    ) -> Result<Self> {
        let name = name.into();
        let patterns = PatternSet::compile(patterns)
            .with_context(|| format!("building watch patterns for binding '{name}'"))?;
        Ok(Self {
            name,
            patterns,
            node,
            reload,
        })
    }

    /// Label used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this binding is interested in the given root-relative path.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.patterns.matches(rel_path)
    }
}
