use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::mpsc;

use crate::{
    agent::models::error::AgentBuildError,
    notifications::Notification,
    services::llm::{AgentClient, AgentEndpoint, ClientConfig},
    Agent, Tool, ToolRegistry, DEFAULT_MAX_ITERATIONS,
};

/// A builder for [`Agent`].
///
/// Example:
///
/// ```
/// use agent_graph::AgentBuilder;
///
/// let agent = AgentBuilder::default()
///     // model and an endpoint must be set, everything else
///     // has defaults and is optional
///     .set_model("anthropic.claude-3-haiku")
///     .set_base_url("http://localhost:8080")
///     .set_agent_id("MORTGAGE")
///     .set_instructions("You are a mortgage assistant.")
///     .set_max_iterations(6)
///     .build();
/// assert!(agent.is_ok());
/// ```
#[derive(Default)]
pub struct AgentBuilder {
    /// Name used for logging and notifications
    name: Option<String>,
    /// Model identifier advertised to the endpoint
    model: Option<String>,
    /// Instructions sent with every turn
    instructions: Option<String>,

    /// Root URL of the hosted agent runtime
    base_url: Option<String>,
    /// Hosted agent identifier
    agent_id: Option<String>,
    /// Deployed alias of the hosted agent
    alias_id: Option<String>,
    /// Per-call time budget
    timeout: Option<Duration>,
    /// Extra HTTP headers appended to every request
    extra_headers: Option<HashMap<String, String>>,
    /// In-process endpoint used instead of HTTP
    endpoint: Option<Arc<dyn AgentEndpoint>>,

    /// Local tools the agent can call
    tools: Vec<Tool>,
    /// Safety cap on conversation turns per run
    max_iterations: Option<usize>,
    /// Ask the endpoint for trace data
    enable_trace: Option<bool>,

    /// Optional mpsc sender for notifications
    notification_channel: Option<mpsc::Sender<Notification>>,
}

impl AgentBuilder {
    /// Import client settings from a `ClientConfig`.
    /// Only fields present in `conf` are applied.
    pub fn import_client_config(mut self, conf: ClientConfig) -> Self {
        if let Some(base_url) = conf.base_url {
            self = self.set_base_url(base_url);
        }
        if let Some(agent_id) = conf.agent_id {
            self = self.set_agent_id(agent_id);
        }
        if let Some(alias_id) = conf.alias_id {
            self = self.set_alias_id(alias_id);
        }
        if let Some(timeout) = conf.timeout {
            self = self.set_timeout(timeout);
        }
        if let Some(extra_headers) = conf.extra_headers {
            self = self.set_extra_headers(extra_headers);
        }
        self
    }

    /// Set the name of the agent (used in logging)
    pub fn set_name<T>(mut self, name: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(name.into());
        self
    }

    /// Select the underlying model name.
    pub fn set_model<T: Into<String>>(mut self, model: T) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Instructions sent along with every turn.
    pub fn set_instructions<T: Into<String>>(mut self, instructions: T) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Root URL of the agent runtime.
    pub fn set_base_url<T>(mut self, base_url: T) -> Self
    where
        T: Into<String>,
    {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn set_agent_id<T: Into<String>>(mut self, agent_id: T) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn set_alias_id<T: Into<String>>(mut self, alias_id: T) -> Self {
        self.alias_id = Some(alias_id.into());
        self
    }

    /// Time budget for a single endpoint call.
    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Provide additional HTTP headers to include on each request.
    pub fn set_extra_headers(mut self, extra_headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(extra_headers);
        self
    }

    /// Answer turns with an in-process endpoint instead of HTTP.
    /// Takes precedence over `set_base_url`.
    pub fn set_endpoint<E>(mut self, endpoint: E) -> Self
    where
        E: AgentEndpoint + 'static,
    {
        self.endpoint = Some(Arc::new(endpoint));
        self
    }

    /// Add a local tool.
    pub fn add_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set max_iterations. Caps the number of conversation turns a single
    /// run may take before it fails with `MaxIterationsExceeded`.
    pub fn set_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn set_enable_trace(mut self, enable: bool) -> Self {
        self.enable_trace = Some(enable);
        self
    }

    pub fn set_notification_channel(mut self, channel: mpsc::Sender<Notification>) -> Self {
        self.notification_channel = Some(channel);
        self
    }

    /// Build an [`Agent`] and return also the notification receiver.
    ///
    /// Creates an internal mpsc channel of size 100.
    pub fn build_with_notification(
        mut self,
    ) -> Result<(Agent, mpsc::Receiver<Notification>), AgentBuildError> {
        let (sender, receiver) = mpsc::channel(100);
        self.notification_channel = Some(sender);
        let agent = self.build()?;
        Ok((agent, receiver))
    }

    /// Finalize all settings and produce an [`Agent`], or an error if required fields missing or invalid.
    pub fn build(self) -> Result<Agent, AgentBuildError> {
        let model = self.model.ok_or(AgentBuildError::ModelNotSet)?;

        let instructions = self
            .instructions
            .unwrap_or_else(|| "You are a helpful agent.".into());

        let name = match self.name {
            Some(n) => n,
            None => format!("Agent-{model}"),
        };

        let client_config = ClientConfig {
            base_url: self.base_url,
            agent_id: self.agent_id,
            alias_id: self.alias_id,
            timeout: self.timeout,
            extra_headers: self.extra_headers,
        };

        let client = match self.endpoint {
            Some(endpoint) => AgentClient::from_shared(endpoint, client_config),
            None if client_config.base_url.is_some() => AgentClient::try_from(client_config)?,
            None => return Err(AgentBuildError::EndpointNotSet),
        };

        let mut tools = ToolRegistry::new();
        for tool in self.tools {
            tools.register(tool)?;
        }

        Ok(Agent::new(
            name,
            model,
            instructions,
            tools,
            self.enable_trace.unwrap_or(false),
            self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            self.notification_channel,
            client,
        ))
    }
}

impl std::fmt::Debug for AgentBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentBuilder")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("agent_id", &self.agent_id)
            .field("alias_id", &self.alias_id)
            .field("timeout", &self.timeout)
            .field("endpoint", &self.endpoint.as_ref().map(|_| "<endpoint>"))
            .field("tools", &self.tools)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}
