use crate::{InvocationError, ToolRegistryError};

/// Errors that can occur while running an [`Agent`](crate::Agent).
///
/// Tool failures are absent on purpose: the dispatch step absorbs them.
#[derive(Debug)]
pub enum AgentError {
    /// The agent endpoint call failed; the run is aborted.
    Invocation(InvocationError),
    /// The loop ran the given number of conversation turns without settling.
    MaxIterationsExceeded(usize),
}

impl std::fmt::Display for AgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentError::Invocation(e) => write!(f, "Agent invocation error: {e}"),
            AgentError::MaxIterationsExceeded(max) => {
                write!(f, "Conversation did not settle within {max} turns")
            }
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::Invocation(e) => Some(e),
            AgentError::MaxIterationsExceeded(_) => None,
        }
    }
}

impl From<InvocationError> for AgentError {
    fn from(err: InvocationError) -> Self {
        AgentError::Invocation(err)
    }
}

/// Errors that can occur while building an [`Agent`](crate::Agent).
#[derive(Debug)]
pub enum AgentBuildError {
    /// Required model was not set on the builder.
    ModelNotSet,
    /// Neither a base URL nor a custom endpoint was provided.
    EndpointNotSet,
    /// A tool was rejected by the registry.
    Registry(ToolRegistryError),
    /// Failure initializing the endpoint client.
    Invocation(InvocationError),
}

impl std::fmt::Display for AgentBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentBuildError::ModelNotSet => write!(f, "Model not set."),
            AgentBuildError::EndpointNotSet => write!(f, "Agent endpoint not set."),
            AgentBuildError::Registry(e) => write!(f, "Tool registry error: {e}"),
            AgentBuildError::Invocation(e) => write!(f, "Endpoint client error: {e}"),
        }
    }
}

impl std::error::Error for AgentBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentBuildError::Registry(e) => Some(e),
            AgentBuildError::Invocation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvocationError> for AgentBuildError {
    fn from(err: InvocationError) -> Self {
        AgentBuildError::Invocation(err)
    }
}

impl From<ToolRegistryError> for AgentBuildError {
    fn from(err: ToolRegistryError) -> Self {
        AgentBuildError::Registry(err)
    }
}
