//! Pod execution: the boundary to the external agent-coordination runtime.
//!
//! The core treats that runtime as an opaque executor: one call in, one
//! terminal outcome out. [`execute`] invokes it on an assembled graph and
//! turns the terminal result or failure into a uniform [`ExecutionOutcome`]
//! with a best-effort per-task trace.

pub mod process;
pub mod progress;

pub use process::ProcessRuntime;
pub use progress::{ConsoleProgress, ProgressReporter, SilentProgress};

use crate::assemble::ExecutionGraph;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Terminal failure signaled by the external runtime.
#[derive(Debug, Clone)]
pub struct RuntimeFailure {
    /// Human-readable failure description. Not a crash dump.
    pub description: String,

    /// Index of the task that failed, when the runtime can say.
    pub failed_task: Option<usize>,
}

impl RuntimeFailure {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            failed_task: None,
        }
    }

    pub fn at_task(mut self, index: usize) -> Self {
        self.failed_task = Some(index);
        self
    }
}

/// The external agent-coordination runtime boundary.
///
/// Implementations receive the fully assembled graph (mutably, so stateful
/// tool instances can be invoked) and run the agents' reasoning loop
/// synchronously per task in graph order. The core assumes nothing about
/// retry or partial-result semantics.
pub trait AgentRuntime {
    fn kickoff(&self, graph: &mut ExecutionGraph) -> Result<String, RuntimeFailure>;
}

/// Best-effort status of one task after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Completed,
    Failed,
    /// An earlier task in the linear workflow failed, so this one never ran.
    NotReached,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::NotReached => write!(f, "not-reached"),
        }
    }
}

/// One entry of the per-task trace.
#[derive(Debug, Clone, Serialize)]
pub struct TaskTrace {
    pub task_key: String,
    pub status: TaskStatus,
}

/// Uniform outcome record for one pod run.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOutcome {
    pub pod_key: String,
    pub success: bool,
    /// Final textual result on success, failure description otherwise.
    pub result: String,
    pub trace: Vec<TaskTrace>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Execute an assembled graph against an agent runtime.
///
/// The workflow is never resumed mid-sequence: when the runtime reports a
/// failing task, every later task is marked not-reached.
pub fn execute(graph: &mut ExecutionGraph, runtime: &dyn AgentRuntime) -> ExecutionOutcome {
    let started_at = Utc::now();
    let pod_key = graph.pod_key.clone();
    let task_keys: Vec<String> = graph.tasks.iter().map(|t| t.key.clone()).collect();

    let (success, result, trace) = match runtime.kickoff(graph) {
        Ok(result) => {
            let trace = task_keys
                .iter()
                .map(|key| TaskTrace {
                    task_key: key.clone(),
                    status: TaskStatus::Completed,
                })
                .collect();
            (true, result, trace)
        }
        Err(failure) => {
            let failed = failure
                .failed_task
                .unwrap_or(0)
                .min(task_keys.len().saturating_sub(1));
            let trace = task_keys
                .iter()
                .enumerate()
                .map(|(i, key)| TaskTrace {
                    task_key: key.clone(),
                    status: match i.cmp(&failed) {
                        std::cmp::Ordering::Less => TaskStatus::Completed,
                        std::cmp::Ordering::Equal => TaskStatus::Failed,
                        std::cmp::Ordering::Greater => TaskStatus::NotReached,
                    },
                })
                .collect();
            (false, failure.description, trace)
        }
    };

    ExecutionOutcome {
        pod_key,
        success,
        result,
        trace,
        started_at,
        finished_at: Utc::now(),
    }
}
