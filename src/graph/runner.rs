// src/graph/runner.rs

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::{debug, error, info};

use crate::errors::{GraphError, TaskError, TransformError};
use crate::graph::node::TaskNode;
use crate::task::Task;

/// Everything a run needs to know about its surroundings.
///
/// Currently just the project root all task paths are resolved against.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub root: PathBuf,
}

impl RunContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Execute a graph node to completion.
///
/// - A leaf task runs on a blocking thread so filesystem work and external
///   tools never stall the async runtime (or the file watcher).
/// - `Parallel` drives all children concurrently and always awaits every
///   one of them; if any fail, the first failure is reported together with
///   the failure count.
/// - `Series` runs children in order and propagates the first error
///   without starting the rest.
pub fn execute<'a>(
    node: &'a TaskNode,
    ctx: &'a RunContext,
) -> BoxFuture<'a, Result<(), GraphError>> {
    async move {
        match node {
            TaskNode::Task(task) => run_task(Arc::clone(task), ctx).await,

            TaskNode::Parallel(children) => {
                debug!(branches = children.len(), "entering parallel group");
                let results = join_all(children.iter().map(|child| execute(child, ctx))).await;

                let total = results.len();
                let mut failures = results.into_iter().filter_map(Result::err);
                match failures.next() {
                    None => Ok(()),
                    Some(first) => {
                        let failed = 1 + failures.count();
                        error!(failed, total, "parallel group had failures");
                        Err(GraphError::Parallel {
                            failed,
                            total,
                            first: Box::new(first),
                        })
                    }
                }
            }

            TaskNode::Series(children) => {
                debug!(links = children.len(), "entering series chain");
                for child in children {
                    // First failure aborts the chain; later links never start.
                    execute(child, ctx).await?;
                }
                Ok(())
            }
        }
    }
    .boxed()
}

async fn run_task(task: Arc<Task>, ctx: &RunContext) -> Result<(), GraphError> {
    let name = task.name.clone();
    let root = ctx.root.clone();

    let joined = tokio::task::spawn_blocking(move || task.run(&root)).await;

    let produced = match joined {
        Ok(result) => result?,
        Err(join_err) => {
            return Err(TaskError::new(
                name,
                "worker",
                TransformError::Worker(join_err.to_string()),
            )
            .into());
        }
    };

    if !produced.is_empty() {
        info!(task = %name, outputs = produced.len(), "task produced outputs");
    }
    Ok(())
}
