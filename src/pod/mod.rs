//! Pod subsystem: definition schema, discovery, and input binding.
//!
//! - **Definition**: the validated in-memory form of one pod YAML file
//! - **Loader**: directory discovery with per-file error isolation
//! - **Inputs**: binding declared inputs against runtime parameters

pub mod definition;
pub mod inputs;
pub mod loader;

pub use definition::{AgentSpec, InputDecl, InputSpec, LlmConfig, PodDefinition, TaskSpec, ToolLists, WorkflowSpec};
pub use inputs::{bind, BoundInputs, RuntimeInputs};
pub use loader::{discover, get, Discovery};
