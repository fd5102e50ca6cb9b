//! Pod assembly: turning a validated definition plus bound inputs into the
//! concrete object graph the agent runtime executes.
//!
//! Assembly resolves each agent's tools through the registry (filtered by the
//! pod's enable/disable lists), renders every task description against the
//! bound inputs, and produces the ordered task sequence. Tool instances are
//! resolved fresh here on every call so no tool state leaks between runs.

use crate::error::{OrcaError, Result};
use crate::pod::{BoundInputs, LlmConfig, PodDefinition};
use crate::tools::{Tool, ToolRegistry};

/// A constructed agent: spec fields plus resolved tool instances.
#[derive(Debug)]
pub struct BoundAgent {
    pub key: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub allow_delegation: bool,
    pub verbose: bool,
    pub tools: Vec<Box<dyn Tool>>,
}

/// A task ready for execution: rendered description, expected output, and
/// the key of its assigned agent.
#[derive(Debug, Clone)]
pub struct BoundTask {
    pub key: String,
    pub description: String,
    pub expected_output: String,
    pub agent: String,
}

/// The assembled graph: constructed agents plus the ordered task sequence.
///
/// Execution order is `tasks` order; the workflow is a linear pipeline, not
/// a dependency graph.
#[derive(Debug)]
pub struct ExecutionGraph {
    pub pod_key: String,
    pub llm: LlmConfig,
    pub verbose: bool,
    pub agents: Vec<BoundAgent>,
    pub tasks: Vec<BoundTask>,
}

impl ExecutionGraph {
    /// Look up a constructed agent by key.
    pub fn agent(&self, key: &str) -> Option<&BoundAgent> {
        self.agents.iter().find(|a| a.key == key)
    }
}

/// Assemble the execution graph for one run.
///
/// Tool filtering: a non-empty pod `enabled` list acts as an allow-list,
/// and `disabled` always overrides. A tool listed on an agent but filtered
/// out by the pod is dropped silently, while a tool that survives filtering
/// must resolve or assembly fails with [`OrcaError::ToolResolution`].
pub fn assemble(
    pod: &PodDefinition,
    bound: &BoundInputs,
    registry: &ToolRegistry,
) -> Result<ExecutionGraph> {
    let mut agents = Vec::with_capacity(pod.agents.len());
    for (key, spec) in &pod.agents {
        let mut tools = Vec::new();
        for tool_name in &spec.tools {
            if !tool_allowed(pod, tool_name) {
                continue;
            }
            tools.push(registry.resolve(tool_name)?);
        }
        agents.push(BoundAgent {
            key: key.clone(),
            role: spec.role.clone(),
            goal: spec.goal.clone(),
            backstory: spec.backstory.clone(),
            allow_delegation: spec.allow_delegation,
            verbose: spec.verbose,
            tools,
        });
    }

    let mut tasks = Vec::new();
    for task_key in pod.workflow_order() {
        let spec = pod.tasks.get(task_key).ok_or_else(|| OrcaError::PodValidation {
            file: pod.key.clone(),
            reason: format!("workflow references unknown task '{}'", task_key),
        })?;

        // Re-check the agent reference even though load-time validation
        // already enforced it; assembly must not assume upstream validation
        // is exhaustive.
        if !agents.iter().any(|a| a.key == spec.agent) {
            return Err(OrcaError::UnknownAgentReference {
                task: task_key.to_string(),
                agent: spec.agent.clone(),
            });
        }

        let description = bound
            .render(&spec.description)
            .map_err(|source| OrcaError::Template {
                task: task_key.to_string(),
                source,
            })?;

        tasks.push(BoundTask {
            key: task_key.to_string(),
            description,
            expected_output: spec.expected_output.clone(),
            agent: spec.agent.clone(),
        });
    }

    Ok(ExecutionGraph {
        pod_key: pod.key.clone(),
        llm: pod.llm.clone(),
        verbose: pod.workflow.verbose,
        agents,
        tasks,
    })
}

fn tool_allowed(pod: &PodDefinition, name: &str) -> bool {
    let lists = &pod.tools;
    if lists.disabled.iter().any(|t| t == name) {
        return false;
    }
    // An empty enabled list means no allow-list restriction.
    lists.enabled.is_empty() || lists.enabled.iter().any(|t| t == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pod::{self, definition::fixtures, RuntimeInputs};
    use crate::tools::ToolSpec;
    use std::collections::BTreeMap;

    fn registry_with(names: &[&str]) -> ToolRegistry {
        let specs: BTreeMap<String, ToolSpec> = names
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    ToolSpec {
                        module: "builtin".to_string(),
                        class_name: "CodeAnalysisTool".to_string(),
                        config: BTreeMap::new(),
                    },
                )
            })
            .collect();
        ToolRegistry::from_specs(specs)
    }

    fn bound(pod: &PodDefinition, pairs: &[(&str, &str)]) -> BoundInputs {
        let runtime: RuntimeInputs = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        pod::bind(pod, &runtime).unwrap()
    }

    fn two_tool_pod(enabled: &[&str], disabled: &[&str]) -> PodDefinition {
        let yaml = format!(
            r#"
agents:
  researcher:
    role: "Researcher"
    goal: "Find facts"
    backstory: "Thorough."
    tools: [search_tool, scrape_tool]
tasks:
  research:
    description: "Research {{topic}}"
    expected_output: "Notes"
    agent: researcher
tools:
  enabled: [{}]
  disabled: [{}]
inputs:
  required:
    - name: topic
"#,
            enabled.join(", "),
            disabled.join(", ")
        );
        PodDefinition::parse("research", &yaml).unwrap()
    }

    #[test]
    fn assembles_content_creation_scenario() {
        let pod = fixtures::content_creation();
        let bound = bound(&pod, &[("topic", "ocean conservation")]);
        let graph = assemble(&pod, &bound, &registry_with(&[])).unwrap();

        assert_eq!(graph.pod_key, "content_creation");
        assert_eq!(graph.agents.len(), 1);
        assert_eq!(graph.tasks.len(), 1);
        assert_eq!(graph.tasks[0].key, "write_post");
        assert_eq!(graph.tasks[0].description, "Write about ocean conservation");
        assert_eq!(graph.tasks[0].agent, "writer");
        assert_eq!(graph.agent("writer").unwrap().role, "Senior Writer");
    }

    #[test]
    fn unresolvable_tool_fails_assembly() {
        let pod = two_tool_pod(&[], &[]);
        let bound = bound(&pod, &[("topic", "tides")]);
        // Registry declares search_tool only; scrape_tool is unknown.
        let err = assemble(&pod, &bound, &registry_with(&["search_tool"])).unwrap_err();
        assert!(matches!(err, OrcaError::ToolResolution { ref tool, .. } if tool == "scrape_tool"));
    }

    #[test]
    fn enabled_list_acts_as_allow_list() {
        let pod = two_tool_pod(&["search_tool"], &[]);
        let bound = bound(&pod, &[("topic", "tides")]);
        // scrape_tool is not in the registry, but the allow-list drops it
        // before resolution is attempted.
        let graph = assemble(&pod, &bound, &registry_with(&["search_tool"])).unwrap();

        let agent = graph.agent("researcher").unwrap();
        assert_eq!(agent.tools.len(), 1);
        assert_eq!(agent.tools[0].name(), "search_tool");
    }

    #[test]
    fn disabled_overrides_enabled() {
        let pod = two_tool_pod(&["search_tool", "scrape_tool"], &["scrape_tool"]);
        let bound = bound(&pod, &[("topic", "tides")]);
        let graph = assemble(&pod, &bound, &registry_with(&["search_tool", "scrape_tool"])).unwrap();

        let agent = graph.agent("researcher").unwrap();
        assert_eq!(agent.tools.len(), 1);
        assert_eq!(agent.tools[0].name(), "search_tool");
    }

    #[test]
    fn empty_enabled_list_allows_everything_not_disabled() {
        let pod = two_tool_pod(&[], &[]);
        let bound = bound(&pod, &[("topic", "tides")]);
        let graph = assemble(&pod, &bound, &registry_with(&["search_tool", "scrape_tool"])).unwrap();
        assert_eq!(graph.agent("researcher").unwrap().tools.len(), 2);
    }

    #[test]
    fn unbound_placeholder_fails_assembly_with_template_error() {
        let pod = fixtures::content_creation();
        // The description references {style}, which no input declares.
        let yaml = r#"
agents:
  writer:
    role: "Writer"
    goal: "Write"
    backstory: "Writes."
tasks:
  write_post:
    description: "Write about {topic} in {style}"
    expected_output: "Post"
    agent: writer
inputs:
  required:
    - name: topic
"#;
        let pod2 = PodDefinition::parse("styled", yaml).unwrap();
        let bound = bound(&pod, &[("topic", "tides")]);
        let err = assemble(&pod2, &bound, &registry_with(&[])).unwrap_err();
        match err {
            OrcaError::Template { task, source } => {
                assert_eq!(task, "write_post");
                assert!(source.to_string().contains("style"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn defensive_unknown_agent_check_fires_on_unvalidated_definition() {
        // Build a definition by hand, skipping parse-time validation, to
        // prove assembly re-checks the agent reference on its own.
        let mut pod = fixtures::content_creation();
        if let Some(task) = pod.tasks.get_mut("write_post") {
            task.agent = "ghost".to_string();
        }
        let bound = bound(&fixtures::content_creation(), &[("topic", "tides")]);

        let err = assemble(&pod, &bound, &registry_with(&[])).unwrap_err();
        assert!(matches!(
            err,
            OrcaError::UnknownAgentReference { ref task, ref agent }
                if task == "write_post" && agent == "ghost"
        ));
    }

    #[test]
    fn tasks_follow_workflow_order() {
        let yaml = r#"
agents:
  solo:
    role: "Worker"
    goal: "Work"
    backstory: "Works."
tasks:
  alpha:
    description: "First"
    expected_output: "A"
    agent: solo
  beta:
    description: "Second"
    expected_output: "B"
    agent: solo
workflow:
  tasks: [beta, alpha]
"#;
        let pod = PodDefinition::parse("ordered", yaml).unwrap();
        let bound = bound(&pod, &[]);
        let graph = assemble(&pod, &bound, &registry_with(&[])).unwrap();
        let keys: Vec<&str> = graph.tasks.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["beta", "alpha"]);
    }
}
