use core::fmt;

use tokio::sync::mpsc::{self, Sender};
use tracing::instrument;

use crate::agent::models::{configs::AgentConfig, error::AgentError};
use crate::services::llm::{AgentClient, ClientConfig};
use crate::{
    converse, dispatch_tool, notifications::Notification, run_conversation_loop,
    ConversationState, Message, NotificationHandler, Route, Tool, ToolRegistry, ToolResult,
};

/// A configured agent: endpoint client, local tools and loop policy.
///
/// The agent holds no conversation of its own. Every run works on a
/// [`ConversationState`] owned by the caller.
#[derive(Clone)]
pub struct Agent {
    /// Human-readable name of the agent.
    pub name: String,
    /// Underlying model identifier.
    pub model: String,
    /// System instructions sent with every turn.
    pub instructions: String,
    /// Locally executable tools.
    pub tools: ToolRegistry,
    /// Ask the endpoint for trace data.
    pub enable_trace: bool,
    /// Maximum conversation turns in a single run.
    pub max_iterations: usize,
    /// Notification channel for emitting agent events.
    pub notification_channel: Option<Sender<Notification>>,
    /// Backend endpoint client.
    pub(crate) client: AgentClient,
}

impl Agent {
    pub(crate) fn new(
        name: String,
        model: String,
        instructions: String,
        tools: ToolRegistry,
        enable_trace: bool,
        max_iterations: usize,
        notification_channel: Option<Sender<Notification>>,
        client: AgentClient,
    ) -> Self {
        Self {
            name,
            model,
            instructions,
            tools,
            enable_trace,
            max_iterations,
            notification_channel,
            client,
        }
    }

    /// Build the per-call configuration for the next turn.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            model: self.model.clone(),
            instructions: self.instructions.clone(),
            tools: self.tools.declarations(),
            enable_trace: self.enable_trace,
        }
    }

    /// Start a new conversation from `prompt` and run it to completion.
    #[instrument(level = "debug", skip(self, prompt), fields(agent_name = %self.name))]
    pub async fn invoke<T>(&self, prompt: T) -> Result<ConversationState, AgentError>
    where
        T: Into<String>,
    {
        self.run(ConversationState::from_prompt(prompt)).await
    }

    /// Run the control loop on `state` and hand back the terminal state.
    pub async fn run(&self, mut state: ConversationState) -> Result<ConversationState, AgentError> {
        self.drive(&mut state).await?;
        Ok(state)
    }

    /// Run the control loop in place, returning the route that ended it.
    pub async fn drive(&self, state: &mut ConversationState) -> Result<Route, AgentError> {
        run_conversation_loop(self, state).await
    }

    /// One conversation turn. See [`converse`].
    pub async fn conversation_step(
        &self,
        state: &mut ConversationState,
        user_text: Option<String>,
    ) -> Result<Message, AgentError> {
        converse(self, state, user_text).await
    }

    /// One tool dispatch. See [`dispatch_tool`].
    pub async fn tool_dispatch_step(&self, state: &mut ConversationState) -> Option<ToolResult> {
        dispatch_tool(self, state).await
    }

    /// Create a new notification channel for this agent.
    pub fn new_notification_channel(&mut self) -> mpsc::Receiver<Notification> {
        let (s, r) = mpsc::channel::<Notification>(100);
        self.notification_channel = Some(s);
        r
    }

    /// Find a tool by registry key, if it exists.
    pub fn get_tool_ref_by_name<T>(&self, name: T) -> Option<&Tool>
    where
        T: AsRef<str>,
    {
        self.tools.get(name.as_ref())
    }

    /// Export current client configuration (base URL, agent id, timeout, ...).
    pub fn export_client_config(&self) -> ClientConfig {
        self.client.get_config().clone()
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("instructions", &self.instructions)
            .field("tools", &self.tools)
            .field("enable_trace", &self.enable_trace)
            .field("max_iterations", &self.max_iterations)
            .field("client", &self.client)
            .field("notification_channel", &self.notification_channel)
            .finish()
    }
}

impl NotificationHandler for Agent {
    fn get_outgoing_channel(&self) -> &Option<Sender<Notification>> {
        &self.notification_channel
    }

    fn get_channel_name(&self) -> &String {
        &self.name
    }
}
