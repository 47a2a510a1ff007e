use std::{collections::HashMap, time::Duration};

use crate::services::llm::{AgentClient, InvocationError};

/// Default time budget for one call to the agent endpoint.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Root URL of the agent runtime.
    pub base_url: Option<String>,
    /// Identifier of the hosted agent.
    pub agent_id: Option<String>,
    /// Alias (deployed version) of the hosted agent.
    pub alias_id: Option<String>,
    /// Per-request timeout, `DEFAULT_TIMEOUT` when unset.
    pub timeout: Option<Duration>,
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ClientConfig {
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

pub trait ClientBuilder {
    fn base_url(self, base_url: Option<impl Into<String>>) -> Self;
    fn agent_id(self, agent_id: Option<impl Into<String>>) -> Self;
    fn alias_id(self, alias_id: Option<impl Into<String>>) -> Self;
    fn timeout(self, timeout: Option<Duration>) -> Self;
    fn extra_headers(self, extra_headers: Option<HashMap<String, String>>) -> Self;
    fn build(self) -> Result<AgentClient, InvocationError>;
}

impl ClientBuilder for ClientConfig {
    fn base_url(mut self, base_url: Option<impl Into<String>>) -> Self {
        self.base_url = base_url.map(|s| s.into());
        self
    }

    fn agent_id(mut self, agent_id: Option<impl Into<String>>) -> Self {
        self.agent_id = agent_id.map(|s| s.into());
        self
    }

    fn alias_id(mut self, alias_id: Option<impl Into<String>>) -> Self {
        self.alias_id = alias_id.map(|s| s.into());
        self
    }

    fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn extra_headers(mut self, extra_headers: Option<HashMap<String, String>>) -> Self {
        self.extra_headers = extra_headers;
        self
    }

    fn build(self) -> Result<AgentClient, InvocationError> {
        AgentClient::try_from(self)
    }
}
