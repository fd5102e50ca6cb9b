//! Input binding: reconciling declared pod inputs with runtime parameters.
//!
//! Binding collects every missing required input before failing, so an
//! operator sees all gaps at once instead of fixing them one run at a time.
//! This is the one place the design deliberately avoids fail-fast.

use crate::error::{OrcaError, Result};
use crate::pod::PodDefinition;
use crate::template::{self, TemplateError};
use std::collections::BTreeMap;

/// Runtime-supplied key/value parameters for one run.
pub type RuntimeInputs = BTreeMap<String, String>;

/// The flat string-to-string mapping produced by binding: runtime inputs
/// plus defaults for absent optional inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundInputs {
    values: BTreeMap<String, String>,
}

impl BoundInputs {
    /// The bound value for a name, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// All bound values.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Render a task description template against these inputs.
    ///
    /// Substitution is strict: a placeholder with no bound value is a
    /// [`TemplateError`].
    pub fn render(&self, template: &str) -> std::result::Result<String, TemplateError> {
        template::render(template, &self.values)
    }
}

/// Bind runtime inputs against a pod's declared inputs.
///
/// Every declared required input must be present in `runtime_inputs`; all
/// missing names are reported together in [`OrcaError::MissingInputs`], in
/// declaration order. Optional inputs absent from `runtime_inputs` take
/// their declared default, or are omitted when they have none. Extra
/// runtime inputs pass through untouched.
pub fn bind(pod: &PodDefinition, runtime_inputs: &RuntimeInputs) -> Result<BoundInputs> {
    let missing: Vec<String> = pod
        .inputs
        .required
        .iter()
        .filter(|decl| !runtime_inputs.contains_key(&decl.name))
        .map(|decl| decl.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(OrcaError::MissingInputs(missing));
    }

    let mut values = runtime_inputs.clone();
    for decl in &pod.inputs.optional {
        if values.contains_key(&decl.name) {
            continue;
        }
        if let Some(default) = &decl.default {
            values.insert(decl.name.clone(), default.clone());
        }
    }

    Ok(BoundInputs { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pod::definition::fixtures;

    fn inputs(pairs: &[(&str, &str)]) -> RuntimeInputs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn pod_with_optional() -> PodDefinition {
        PodDefinition::parse(
            "research",
            r#"
agents:
  analyst:
    role: "Analyst"
    goal: "Research"
    backstory: "Curious."
tasks:
  research:
    description: "Research {topic} at {depth} depth for {industry}"
    expected_output: "Notes"
    agent: analyst
inputs:
  required:
    - name: topic
    - name: industry
  optional:
    - name: depth
      default: "shallow"
    - name: region
"#,
        )
        .unwrap()
    }

    #[test]
    fn binds_required_input() {
        let pod = fixtures::content_creation();
        let bound = bind(&pod, &inputs(&[("topic", "ocean conservation")])).unwrap();
        assert_eq!(bound.get("topic"), Some("ocean conservation"));
    }

    #[test]
    fn reports_all_missing_required_inputs_at_once() {
        let pod = pod_with_optional();
        let err = bind(&pod, &RuntimeInputs::new()).unwrap_err();
        match err {
            OrcaError::MissingInputs(names) => {
                assert_eq!(names, vec!["topic".to_string(), "industry".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn partial_supply_still_reports_the_remaining_gap() {
        let pod = pod_with_optional();
        let err = bind(&pod, &inputs(&[("industry", "Software")])).unwrap_err();
        match err {
            OrcaError::MissingInputs(names) => assert_eq!(names, vec!["topic".to_string()]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn optional_default_applies_when_absent() {
        let pod = pod_with_optional();
        let bound = bind(&pod, &inputs(&[("topic", "tides"), ("industry", "Marine")])).unwrap();
        assert_eq!(bound.get("depth"), Some("shallow"));
    }

    #[test]
    fn supplied_optional_wins_over_default() {
        let pod = pod_with_optional();
        let bound = bind(
            &pod,
            &inputs(&[("topic", "tides"), ("industry", "Marine"), ("depth", "comprehensive")]),
        )
        .unwrap();
        assert_eq!(bound.get("depth"), Some("comprehensive"));
    }

    #[test]
    fn optional_without_default_is_omitted() {
        let pod = pod_with_optional();
        let bound = bind(&pod, &inputs(&[("topic", "tides"), ("industry", "Marine")])).unwrap();
        assert_eq!(bound.get("region"), None);
    }

    #[test]
    fn extra_runtime_inputs_pass_through() {
        let pod = fixtures::content_creation();
        let bound = bind(&pod, &inputs(&[("topic", "tides"), ("tone", "casual")])).unwrap();
        assert_eq!(bound.get("tone"), Some("casual"));
    }

    #[test]
    fn binding_is_idempotent() {
        let pod = pod_with_optional();
        let runtime = inputs(&[("topic", "tides"), ("industry", "Marine")]);
        let first = bind(&pod, &runtime).unwrap();
        let second = bind(&pod, &runtime).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn render_substitutes_bound_values() {
        let pod = fixtures::content_creation();
        let bound = bind(&pod, &inputs(&[("topic", "AI in Healthcare")])).unwrap();
        let rendered = bound.render("Write about {topic}").unwrap();
        assert_eq!(rendered, "Write about AI in Healthcare");
    }

    #[test]
    fn render_rejects_unbound_placeholder() {
        let pod = fixtures::content_creation();
        let bound = bind(&pod, &inputs(&[("topic", "AI")])).unwrap();
        let err = bound.render("Write about {topic} for {audience}").unwrap_err();
        assert!(matches!(err, TemplateError::UndefinedPlaceholder { ref name, .. } if name == "audience"));
    }
}
