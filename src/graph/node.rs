// src/graph/node.rs

use std::sync::Arc;

use crate::task::Task;

/// A node in the task graph: either a leaf task, a group executed
/// concurrently, or a chain executed strictly in order.
///
/// Composition is recursive; the two top-level pipelines need exactly
/// this nesting (a parallel build fan-out vs. a clean-then-collect chain).
#[derive(Debug)]
pub enum TaskNode {
    Task(Arc<Task>),
    Parallel(Vec<TaskNode>),
    Series(Vec<TaskNode>),
}

impl TaskNode {
    pub fn task(task: Task) -> Self {
        TaskNode::Task(Arc::new(task))
    }

    pub fn parallel(children: impl IntoIterator<Item = TaskNode>) -> Self {
        TaskNode::Parallel(children.into_iter().collect())
    }

    pub fn series(children: impl IntoIterator<Item = TaskNode>) -> Self {
        TaskNode::Series(children.into_iter().collect())
    }

    /// Names of all leaf tasks in declaration order.
    pub fn task_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TaskNode::Task(task) => out.push(&task.name),
            TaskNode::Parallel(children) | TaskNode::Series(children) => {
                for child in children {
                    child.collect_names(out);
                }
            }
        }
    }

    /// Render the node as an indented tree, for dry-run output.
    pub fn render(&self, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        match self {
            TaskNode::Task(task) => format!(
                "{pad}task {} ({} steps) {:?} -> {:?}\n",
                task.name,
                task.steps.len(),
                task.inputs.raw(),
                task.output_dir,
            ),
            TaskNode::Parallel(children) => {
                let mut s = format!("{pad}parallel:\n");
                for child in children {
                    s.push_str(&child.render(indent + 1));
                }
                s
            }
            TaskNode::Series(children) => {
                let mut s = format!("{pad}series:\n");
                for child in children {
                    s.push_str(&child.render(indent + 1));
                }
                s
            }
        }
    }
}
