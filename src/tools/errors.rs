/// Errors that can occur during execution of a tool.
///
/// The tool-dispatch step never propagates these: they are logged and the
/// agent simply receives no tool result on its next turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolExecutionError {
    /// The arguments do not match the tool's declared parameters.
    ArgumentMismatch(String),
    /// The tool failed during execution (runtime failure inside the tool).
    ExecutionFailed(String),
    /// No tool is registered under the requested key.
    UnregisteredTool(String),
    /// The triggering message carried no correlation id to answer to.
    MissingCorrelationId,
}

impl std::fmt::Display for ToolExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolExecutionError::ArgumentMismatch(s) => write!(f, "Tool argument mismatch: {s}"),
            ToolExecutionError::ExecutionFailed(s) => write!(f, "Tool execution failed: {s}"),
            ToolExecutionError::UnregisteredTool(s) => write!(f, "Tool not registered: {s}"),
            ToolExecutionError::MissingCorrelationId => {
                write!(f, "Tool call has no correlation id")
            }
        }
    }
}

impl std::error::Error for ToolExecutionError {}

/// Rejected tool registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRegistryError {
    EmptyName,
    /// Registry keys must not contain the `::` namespace delimiter.
    InvalidName(String),
    Duplicate(String),
}

impl std::fmt::Display for ToolRegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolRegistryError::EmptyName => write!(f, "Tool name must not be empty."),
            ToolRegistryError::InvalidName(name) => {
                write!(f, "Tool name '{name}' must not contain '::'.")
            }
            ToolRegistryError::Duplicate(name) => write!(f, "Tool '{name}' is already registered."),
        }
    }
}

impl std::error::Error for ToolRegistryError {}
