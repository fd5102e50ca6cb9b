//! Pod definition schema.
//!
//! One pod YAML file describes a named group of cooperating agents and the
//! ordered workflow that drives them:
//!
//! ```yaml
//! name: "Content Creation Pod"
//! description: "Research and write a blog post"
//!
//! llm:
//!   model: ollama/llama3.2
//!   base_url: http://localhost:11434
//!
//! agents:
//!   writer:
//!     role: "Senior Writer"
//!     goal: "Write engaging posts about {topic}"
//!     backstory: "A seasoned technology writer."
//!     tools: [search_tool]
//!
//! tasks:
//!   write_post:
//!     description: "Write about {topic}"
//!     expected_output: "A 500-word blog post"
//!     agent: writer
//!
//! workflow:
//!   tasks: [write_post]
//!
//! tools:
//!   enabled: [search_tool]
//!   disabled: []
//!
//! inputs:
//!   required:
//!     - name: topic
//!       description: "Topic to write about"
//!       example: "AI in Healthcare"
//!   optional:
//!     - name: audience
//!       description: "Target audience"
//!       default: "general readers"
//! ```
//!
//! Definitions are validated eagerly at load time and immutable afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Language-model configuration for a pod.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "ollama/llama3.2".to_string(),
            base_url: "http://localhost:11434".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

/// One agent in a pod: a role-playing worker with a goal, backstory, and an
/// attached tool set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub role: String,
    pub goal: String,
    pub backstory: String,

    /// Names of registry tools this agent may use, in attachment order.
    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default)]
    pub allow_delegation: bool,

    #[serde(default = "default_true")]
    pub verbose: bool,
}

/// One unit of work: a description template, expected output, and the key of
/// the agent assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    pub description: String,
    pub expected_output: String,
    pub agent: String,
}

/// The ordered task sequence forming a pod's workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSpec {
    /// Execution order. Empty means every task, in definition order.
    pub tasks: Vec<String>,

    pub verbose: bool,
}

impl Default for WorkflowSpec {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            verbose: true,
        }
    }
}

/// Pod-level tool enable/disable lists.
///
/// A non-empty `enabled` list is an allow-list; `disabled` always overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolLists {
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
}

/// Declaration of one named input parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDecl {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Example value shown by `info` and the interactive prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,

    /// Default value, applied when an optional input is not supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Declared required and optional inputs for a pod.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSpec {
    pub required: Vec<InputDecl>,
    pub optional: Vec<InputDecl>,
}

/// The validated, in-memory representation of one pod definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodDefinition {
    /// File-derived pod key (file stem). Not part of the wire format.
    #[serde(skip)]
    pub key: String,

    /// Display name. Defaults to the pod key when absent.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default, deserialize_with = "crate::yaml::unique_keys")]
    pub agents: BTreeMap<String, AgentSpec>,

    #[serde(default, deserialize_with = "crate::yaml::unique_keys")]
    pub tasks: BTreeMap<String, TaskSpec>,

    #[serde(default)]
    pub workflow: WorkflowSpec,

    #[serde(default)]
    pub tools: ToolLists,

    #[serde(default)]
    pub inputs: InputSpec,
}

fn default_true() -> bool {
    true
}

impl PodDefinition {
    /// Parse and validate a pod definition from YAML.
    ///
    /// `key` is the file-derived pod key. On failure the returned string is
    /// the validation reason; the loader attaches the offending file name.
    pub fn parse(key: &str, yaml: &str) -> std::result::Result<Self, String> {
        let mut pod: PodDefinition =
            serde_yaml::from_str(yaml).map_err(|e| format!("parse error: {}", e))?;
        pod.key = key.to_string();
        if pod.name.is_empty() {
            pod.name = key.to_string();
        }
        pod.validate()?;
        Ok(pod)
    }

    /// Check the structural invariants of a parsed definition.
    ///
    /// Rules:
    /// - at least one agent and at least one task
    /// - every task's `agent` references an existing agent key
    /// - every workflow entry references an existing task key, exactly once
    /// - input names are unique across required and optional
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.agents.is_empty() {
            return Err("pod declares no agents".to_string());
        }
        if self.tasks.is_empty() {
            return Err("pod declares no tasks".to_string());
        }

        for (task_key, task) in &self.tasks {
            if !self.agents.contains_key(&task.agent) {
                return Err(format!(
                    "task '{}' references unknown agent '{}'",
                    task_key, task.agent
                ));
            }
        }

        let mut seen = BTreeSet::new();
        for task_key in &self.workflow.tasks {
            if !self.tasks.contains_key(task_key) {
                return Err(format!("workflow references unknown task '{}'", task_key));
            }
            if !seen.insert(task_key) {
                return Err(format!(
                    "workflow lists task '{}' more than once; the workflow is a linear pipeline",
                    task_key
                ));
            }
        }

        let mut names = BTreeSet::new();
        for decl in self.inputs.required.iter().chain(&self.inputs.optional) {
            if decl.name.is_empty() {
                return Err("input declaration with empty name".to_string());
            }
            if !names.insert(decl.name.as_str()) {
                return Err(format!("input '{}' declared more than once", decl.name));
            }
        }

        Ok(())
    }

    /// Task keys in execution order. An empty workflow list means every task
    /// in definition order.
    pub fn workflow_order(&self) -> Vec<&str> {
        if self.workflow.tasks.is_empty() {
            self.tasks.keys().map(String::as_str).collect()
        } else {
            self.workflow.tasks.iter().map(String::as_str).collect()
        }
    }

    /// Names of the declared required inputs, in declaration order.
    pub fn required_input_names(&self) -> Vec<&str> {
        self.inputs.required.iter().map(|d| d.name.as_str()).collect()
    }

    /// Names of the declared optional inputs, in declaration order.
    pub fn optional_input_names(&self) -> Vec<&str> {
        self.inputs.optional.iter().map(|d| d.name.as_str()).collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A minimal single-agent, single-task pod used across test modules.
    pub(crate) fn content_creation_yaml() -> &'static str {
        r#"
name: "Content Creation Pod"
description: "Research and write a blog post"

agents:
  writer:
    role: "Senior Writer"
    goal: "Write engaging posts"
    backstory: "A seasoned technology writer."

tasks:
  write_post:
    description: "Write about {topic}"
    expected_output: "A 500-word blog post"
    agent: writer

workflow:
  tasks: [write_post]

inputs:
  required:
    - name: topic
      description: "Topic to write about"
      example: "AI in Healthcare"
"#
    }

    pub(crate) fn content_creation() -> PodDefinition {
        PodDefinition::parse("content_creation", content_creation_yaml()).unwrap()
    }
}
