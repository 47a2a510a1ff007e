use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Message, Role, ToolResult};

/// Everything the control loop carries from one step to the next.
///
/// History is append-only: callers can add human turns, but only the
/// conversation step appends agent replies and nothing is ever removed or
/// reordered.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    history: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending_input: Option<ToolResult>,
    #[serde(default)]
    turn_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_token: Option<String>,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    dispatched: HashSet<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh state seeded with one human message.
    pub fn from_prompt<T: Into<String>>(prompt: T) -> Self {
        let mut state = Self::new();
        state.push_human(prompt);
        state
    }

    pub fn push_human<T: Into<String>>(&mut self, text: T) {
        self.history.push(Message::human(text));
    }

    pub fn push_system<T: Into<String>>(&mut self, text: T) {
        self.history.push(Message::system(text));
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.history.last()
    }

    pub fn agent_messages(&self) -> impl Iterator<Item = &Message> {
        self.history.iter().filter(|m| m.role == Role::Agent)
    }

    /// Content of the latest agent reply.
    pub fn last_reply(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|m| m.role == Role::Agent)
            .map(|m| m.content.as_str())
    }

    pub fn pending_input(&self) -> Option<&ToolResult> {
        self.pending_input.as_ref()
    }

    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn was_dispatched(&self, correlation_id: &str) -> bool {
        self.dispatched.contains(correlation_id)
    }

    /// Whether the latest message is an agent request for a tool.
    ///
    /// The request stays open until the agent replies with something else,
    /// also when its correlation id was already dispatched.
    pub fn has_open_tool_call(&self) -> bool {
        self.last_message()
            .is_some_and(|last| last.role == Role::Agent && last.tool_call.is_some())
    }

    pub(crate) fn append(&mut self, message: Message) {
        self.history.push(message);
    }

    pub(crate) fn set_pending_input(&mut self, result: ToolResult) {
        self.pending_input = Some(result);
    }

    pub(crate) fn take_pending_input(&mut self) -> Option<ToolResult> {
        self.pending_input.take()
    }

    /// Keep the first token the endpoint hands out; later ones are ignored.
    pub(crate) fn record_session_token(&mut self, token: &str) {
        if self.session_token.is_none() {
            self.session_token = Some(token.to_string());
        }
    }

    pub(crate) fn bump_turn(&mut self) {
        self.turn_count += 1;
    }

    /// Returns `false` if the id was already consumed.
    pub(crate) fn mark_dispatched(&mut self, correlation_id: &str) -> bool {
        self.dispatched.insert(correlation_id.to_string())
    }
}
