use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    services::llm::models::base::{
        END_SESSION_KEY, INVOCATION_ID_KEY, RETURN_CONTROL_KEY, SESSION_ID_KEY,
    },
    AgentConfig, Message, ToolCall, ToolResult,
};

/// A single outbound call to the agent endpoint.
///
/// Built fresh for every conversation turn; the pending tool result is
/// merged in here and nowhere else.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AgentRequest {
    pub config: AgentConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResult>,
}

impl AgentRequest {
    /// Text of the most recent human message, if any.
    pub fn latest_human_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::Role::Human)
            .map(|m| m.content.as_str())
    }
}

/// What the endpoint answered: a final text, or a request to run a tool.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AgentReply {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(default)]
    pub end_session: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl AgentReply {
    /// A final natural-language answer.
    pub fn text<T: Into<String>>(content: T) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// A tool-call request, correlated by `correlation_id`.
    pub fn tool_call<N, I>(name: N, arguments: Map<String, Value>, correlation_id: I) -> Self
    where
        N: Into<String>,
        I: Into<String>,
    {
        let mut return_control = Map::new();
        return_control.insert(INVOCATION_ID_KEY.into(), Value::String(correlation_id.into()));
        let mut metadata = Map::new();
        metadata.insert(RETURN_CONTROL_KEY.into(), Value::Object(return_control));
        Self {
            tool_call: Some(ToolCall::new(name, arguments)),
            metadata,
            ..Default::default()
        }
    }

    pub fn with_session_token<T: Into<String>>(mut self, token: T) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn ending_session(mut self) -> Self {
        self.end_session = true;
        self
    }

    /// Convert the reply into the agent message appended to history.
    ///
    /// The session token and end-of-session flag are folded into the
    /// message metadata next to whatever opaque fields the endpoint sent.
    pub fn into_message(self) -> Message {
        let mut msg = Message::agent(self.content);
        msg.tool_call = self.tool_call;
        msg.metadata = self.metadata;
        if let Some(token) = self.session_token {
            msg.metadata
                .entry(SESSION_ID_KEY)
                .or_insert(Value::String(token));
        }
        if self.end_session {
            msg.metadata.insert(END_SESSION_KEY.into(), Value::Bool(true));
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_call_reply_carries_correlation_id() {
        let msg = AgentReply::tool_call("Bank::getAssetValue", Map::new(), "inv-7")
            .with_session_token("sess-1")
            .into_message();

        assert_eq!(msg.role, crate::Role::Agent);
        assert_eq!(msg.correlation_id(), Some("inv-7"));
        assert_eq!(msg.session_token(), Some("sess-1"));
        assert_eq!(msg.tool_call.unwrap().name, "Bank::getAssetValue");
    }

    #[test]
    fn ending_session_is_visible_on_message() {
        let msg = AgentReply::text("bye").ending_session().into_message();
        assert!(msg.ends_session());
        assert_eq!(msg.content, "bye");
    }
}
