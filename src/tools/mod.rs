//! Tool registry: global tool declarations and name-to-instance resolution.
//!
//! The global `tools.yaml` file declares every tool available to pods:
//!
//! ```yaml
//! tools:
//!   code_analysis:
//!     module: builtin
//!     class: CodeAnalysisTool
//!     config:
//!       max_findings: 10
//!   search_tool:
//!     module: my_search
//!     class: SearchTool
//!     config:
//!       api_key: serper_api_key_env
//! ```
//!
//! A tool is resolved to a fresh instance on every pod assembly. There is no
//! instance cache: tool state must not leak between pod runs unless a tool is
//! explicitly designed for reuse.
//!
//! Dynamic class lookup from the declarative file maps to a factory map keyed
//! by (module, class) strings, populated with the built-in factories at load
//! time. Callers may register additional factories per registry instance, so
//! tests and embedders can construct isolated registries.
//!
//! Config values are arbitrary YAML scalars. A string value ending in `_env`
//! is an environment variable reference: `serper_api_key_env` resolves to the
//! contents of `SERPER_API_KEY`, and an unset variable fails resolution.

mod builtin;

pub use builtin::{ChartGenerationTool, CodeAnalysisTool, DataAnalysisTool};

use crate::error::{OrcaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A callable capability an agent may invoke during a task.
pub trait Tool {
    /// Stable tool name, as declared in the registry.
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// Invoke the tool. Takes `&mut self` so tools may carry per-run state
    /// (budgets, counters); each pod assembly gets a fresh instance.
    fn run(&mut self, input: &str) -> Result<String>;
}

impl fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Declaration of one tool in the global tools file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Module the implementation lives in. Built-ins use `builtin`.
    pub module: String,

    /// Implementation class within the module.
    #[serde(rename = "class")]
    pub class_name: String,

    /// Constructor configuration passed to the factory.
    #[serde(default)]
    pub config: BTreeMap<String, serde_yaml::Value>,
}

/// Constructor function for a tool implementation.
///
/// Receives the declared tool name and its resolved config (environment
/// references already substituted). Errors are plain strings; the registry
/// wraps them into [`OrcaError::ToolResolution`].
pub type ToolFactory =
    fn(name: &str, config: &BTreeMap<String, serde_yaml::Value>) -> std::result::Result<Box<dyn Tool>, String>;

/// Top-level shape of the tools file.
#[derive(Debug, Deserialize)]
struct ToolsFile {
    #[serde(deserialize_with = "crate::yaml::unique_keys")]
    tools: BTreeMap<String, ToolSpec>,
}

/// Registry of declared tools and the factories that construct them.
pub struct ToolRegistry {
    specs: BTreeMap<String, ToolSpec>,
    factories: BTreeMap<(String, String), ToolFactory>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("specs", &self.specs)
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Load the registry from the global tools file.
    ///
    /// Fails with [`OrcaError::Config`] if the file is absent, unreadable,
    /// malformed, or declares the same tool name twice.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            OrcaError::Config(format!(
                "failed to read tools config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a registry from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: ToolsFile = serde_yaml::from_str(yaml)
            .map_err(|e| OrcaError::Config(format!("failed to parse tools config: {}", e)))?;
        Ok(Self::from_specs(file.tools))
    }

    /// Build a registry from in-memory specs. Built-in factories are always
    /// registered; tests construct isolated registries this way.
    pub fn from_specs(specs: BTreeMap<String, ToolSpec>) -> Self {
        let mut registry = Self {
            specs,
            factories: BTreeMap::new(),
        };
        builtin::register(&mut registry);
        registry
    }

    /// Register a factory for a (module, class) pair.
    ///
    /// Replaces any existing factory under the same pair.
    pub fn register_factory(&mut self, module: &str, class_name: &str, factory: ToolFactory) {
        self.factories
            .insert((module.to_string(), class_name.to_string()), factory);
    }

    /// Whether a tool name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Declared tool names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    /// Number of declared tools.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the registry has no declared tools.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The declaration for a tool name, if any.
    pub fn spec(&self, name: &str) -> Option<&ToolSpec> {
        self.specs.get(name)
    }

    /// Resolve a tool name to a freshly constructed instance.
    ///
    /// Fails with [`OrcaError::ToolResolution`] if the name is not declared,
    /// no factory is registered for its (module, class), an environment
    /// reference in its config is unset, or construction itself fails.
    pub fn resolve(&self, name: &str) -> Result<Box<dyn Tool>> {
        let spec = self.specs.get(name).ok_or_else(|| OrcaError::ToolResolution {
            tool: name.to_string(),
            reason: "tool is not declared in the tools config".to_string(),
        })?;

        let key = (spec.module.clone(), spec.class_name.clone());
        let factory = self.factories.get(&key).ok_or_else(|| OrcaError::ToolResolution {
            tool: name.to_string(),
            reason: format!(
                "no factory registered for module '{}' class '{}'",
                spec.module, spec.class_name
            ),
        })?;

        let config = resolve_env_references(name, &spec.config)?;

        factory(name, &config).map_err(|reason| OrcaError::ToolResolution {
            tool: name.to_string(),
            reason,
        })
    }
}

/// Substitute `*_env` string values with the named environment variable.
///
/// `serper_api_key_env` reads `SERPER_API_KEY`. An unset variable is a
/// resolution failure: a tool must not be constructed with a silently
/// missing credential.
fn resolve_env_references(
    tool: &str,
    config: &BTreeMap<String, serde_yaml::Value>,
) -> Result<BTreeMap<String, serde_yaml::Value>> {
    let mut resolved = BTreeMap::new();

    for (key, value) in config {
        let value = match value.as_str() {
            Some(s) if s.ends_with("_env") => {
                let var = s.trim_end_matches("_env").to_uppercase();
                let env_value = std::env::var(&var).map_err(|_| OrcaError::ToolResolution {
                    tool: tool.to_string(),
                    reason: format!(
                        "config key '{}' references environment variable '{}', which is not set",
                        key, var
                    ),
                })?;
                serde_yaml::Value::String(env_value)
            }
            _ => value.clone(),
        };
        resolved.insert(key.clone(), value);
    }

    Ok(resolved)
}
