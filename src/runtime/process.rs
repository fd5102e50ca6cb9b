//! Subprocess agent runtime.
//!
//! Runs one subprocess per task, in graph order, from a configurable command
//! template. This adapts the graph to any CLI-based agent tool without
//! coupling the core to a specific protocol.
//!
//! # Command template placeholders
//!
//! - `{pod}` - pod key
//! - `{task}` - task key
//! - `{role}`, `{goal}`, `{backstory}` - assigned agent fields
//! - `{description}`, `{expected_output}` - task fields
//! - `{context}` - previous task's stdout (empty for the first task)
//! - `{model}`, `{base_url}` - pod LLM configuration
//!
//! The rendered command is split with `shell-words`; the first word is the
//! program. Stdout of the last task is the run's terminal result. A
//! non-zero exit stops the sequence; later tasks are never started. Retry
//! and timeout policy belong to collaborators wrapping this runtime.

use super::progress::{ProgressReporter, SilentProgress};
use super::{AgentRuntime, RuntimeFailure};
use crate::assemble::{BoundTask, ExecutionGraph};
use crate::template;
use std::collections::BTreeMap;
use std::process::Command;

/// Agent runtime that shells out once per task.
pub struct ProcessRuntime {
    command: String,
    reporter: Box<dyn ProgressReporter>,
}

impl ProcessRuntime {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            reporter: Box::new(SilentProgress),
        }
    }

    /// Attach a progress reporter.
    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    fn run_task(
        &self,
        graph: &ExecutionGraph,
        index: usize,
        task: &BoundTask,
        context: &str,
    ) -> Result<String, RuntimeFailure> {
        let vars = template_vars(graph, task, context);
        let rendered = template::render(&self.command, &vars)
            .map_err(|e| RuntimeFailure::new(format!("runner command template: {}", e)).at_task(index))?;

        let args = shell_words::split(&rendered).map_err(|e| {
            RuntimeFailure::new(format!("cannot parse runner command '{}': {}", rendered, e))
                .at_task(index)
        })?;
        let (program, rest) = args.split_first().ok_or_else(|| {
            RuntimeFailure::new("runner command is empty after rendering").at_task(index)
        })?;

        let output = Command::new(program)
            .args(rest)
            .env("ORCA_POD", &graph.pod_key)
            .env("ORCA_TASK", &task.key)
            .env("ORCA_CONTEXT", context)
            .output()
            .map_err(|e| {
                RuntimeFailure::new(format!("failed to start runner '{}': {}", program, e))
                    .at_task(index)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RuntimeFailure::new(format!(
                "task '{}' runner exited with {}: {}",
                task.key,
                output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                stderr.trim()
            ))
            .at_task(index));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

impl AgentRuntime for ProcessRuntime {
    fn kickoff(&self, graph: &mut ExecutionGraph) -> Result<String, RuntimeFailure> {
        let tasks = graph.tasks.clone();
        let total = tasks.len();
        let mut context = String::new();

        for (index, task) in tasks.iter().enumerate() {
            self.reporter.task_started(index, total, task);
            context = self.run_task(graph, index, task, &context)?;
            self.reporter.task_finished(index, total, task);
        }

        self.reporter.run_finished(total);
        Ok(context)
    }
}

fn template_vars(
    graph: &ExecutionGraph,
    task: &BoundTask,
    context: &str,
) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert("pod".to_string(), graph.pod_key.clone());
    vars.insert("task".to_string(), task.key.clone());
    vars.insert("description".to_string(), task.description.clone());
    vars.insert("expected_output".to_string(), task.expected_output.clone());
    vars.insert("context".to_string(), context.to_string());
    vars.insert("model".to_string(), graph.llm.model.clone());
    vars.insert("base_url".to_string(), graph.llm.base_url.clone());
    if let Some(agent) = graph.agent(&task.agent) {
        vars.insert("role".to_string(), agent.role.clone());
        vars.insert("goal".to_string(), agent.goal.clone());
        vars.insert("backstory".to_string(), agent.backstory.clone());
    }
    vars
}
