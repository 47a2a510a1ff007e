use std::time::Duration;

/// Failures of a single call to the agent endpoint.
///
/// Any of these aborts the running conversation loop; nothing here is
/// recovered locally.
#[derive(Debug)]
pub enum InvocationError {
    /// Transport failure (connection refused, reset, DNS, ...).
    Request(String),
    /// The endpoint answered with a non-success status.
    Api(String),
    /// The reply body could not be decoded.
    Serialization(String),
    /// The call did not complete within the configured timeout.
    Timeout(Duration),
    /// The client could not be constructed from its configuration.
    Config(String),
}

impl std::fmt::Display for InvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvocationError::Request(s) => write!(f, "Request Error: {s}"),
            InvocationError::Api(s) => write!(f, "API Error: {s}"),
            InvocationError::Serialization(s) => write!(f, "Serialization Error: {s}"),
            InvocationError::Timeout(d) => write!(f, "Timed out after {}ms", d.as_millis()),
            InvocationError::Config(s) => write!(f, "Config Error: {s}"),
        }
    }
}

impl std::error::Error for InvocationError {}

impl From<reqwest::Error> for InvocationError {
    fn from(err: reqwest::Error) -> Self {
        InvocationError::Request(err.to_string())
    }
}
