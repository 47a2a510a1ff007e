use serde::{Deserialize, Serialize};

use crate::ToolDeclaration;

/// Agent configuration sent along with one conversation turn.
///
/// A new value is assembled for every call; nothing about a previous
/// turn's tool result lingers in it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AgentConfig {
    /// Identifier of the foundation model backing the agent.
    pub model: String,
    /// System instructions for the agent.
    pub instructions: String,
    /// Tools the agent may ask for.
    #[serde(default)]
    pub tools: Vec<ToolDeclaration>,
    /// Ask the endpoint to include trace data in its replies.
    #[serde(default)]
    pub enable_trace: bool,
}
