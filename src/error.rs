//! Error types for orcasai.
//!
//! Uses thiserror for derive macros. Every variant maps to one of the exit
//! codes in [`crate::exit_codes`], so the CLI collaborator can distinguish
//! "pod not found", "validation/binding error", and "execution failure".

use crate::exit_codes;
use crate::template::TemplateError;
use thiserror::Error;

/// Main error type for orcasai operations.
#[derive(Error, Debug)]
pub enum OrcaError {
    /// The global tools file is absent, malformed, or contains duplicates.
    #[error("tools config error: {0}")]
    Config(String),

    /// A named tool could not be resolved to a constructed instance.
    #[error("failed to resolve tool '{tool}': {reason}")]
    ToolResolution { tool: String, reason: String },

    /// A pod definition file violates the structural invariants.
    #[error("invalid pod definition '{file}': {reason}")]
    PodValidation { file: String, reason: String },

    /// No pod definition file maps to the requested key.
    #[error("pod '{0}' not found")]
    PodNotFound(String),

    /// One or more required inputs were not supplied. All missing names are
    /// collected before this is returned, not just the first.
    #[error("missing required inputs: {}", .0.join(", "))]
    MissingInputs(Vec<String>),

    /// A task description template could not be rendered.
    #[error("task '{task}': {source}")]
    Template {
        task: String,
        source: TemplateError,
    },

    /// A task referenced an agent key that does not exist in the assembled
    /// agent set. Defensive re-check at assembly time.
    #[error("task '{task}' references unknown agent '{agent}'")]
    UnknownAgentReference { task: String, agent: String },

    /// The external agent runtime reported a terminal failure.
    #[error("pod execution failed: {0}")]
    Execution(String),

    /// User provided invalid arguments or the invocation is incomplete.
    #[error("{0}")]
    UserError(String),
}

impl OrcaError {
    /// Returns the exit code the CLI should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            OrcaError::PodNotFound(_) => exit_codes::POD_NOT_FOUND,
            OrcaError::Config(_)
            | OrcaError::ToolResolution { .. }
            | OrcaError::PodValidation { .. }
            | OrcaError::MissingInputs(_)
            | OrcaError::Template { .. }
            | OrcaError::UnknownAgentReference { .. } => exit_codes::VALIDATION_FAILURE,
            OrcaError::Execution(_) => exit_codes::EXECUTION_FAILURE,
            OrcaError::UserError(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for orcasai operations.
pub type Result<T> = std::result::Result<T, OrcaError>;
