use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::ToolCall;

/// Metadata key holding the session id reported by the endpoint.
pub const SESSION_ID_KEY: &str = "sessionId";
/// Metadata key holding the raw return-control payload of a tool-call reply.
pub const RETURN_CONTROL_KEY: &str = "returnControl";
/// Key of the correlation id inside the return-control payload.
pub const INVOCATION_ID_KEY: &str = "invocationId";
/// Metadata key holding trace data, when tracing was enabled on the call.
pub const TRACE_KEY: &str = "trace";
/// Metadata key set when the endpoint closed the session.
pub const END_SESSION_KEY: &str = "endSession";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Human,
    Agent,
}

/// One entry of the conversation history.
///
/// Messages are never edited after being appended to a
/// [`ConversationState`](crate::ConversationState).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    #[serde(default = "new_uuid")]
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    /// Opaque passthrough fields from the agent endpoint.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Message {
    fn new(role: Role, content: String) -> Self {
        Self {
            id: new_uuid(),
            role,
            content,
            tool_call: None,
            metadata: Map::new(),
        }
    }

    pub fn system<T: Into<String>>(content: T) -> Self {
        Self::new(Role::System, content.into())
    }
    pub fn human<T: Into<String>>(content: T) -> Self {
        Self::new(Role::Human, content.into())
    }
    pub fn agent<T: Into<String>>(content: T) -> Self {
        Self::new(Role::Agent, content.into())
    }

    /// Correlation id of the tool-call request carried by this message.
    ///
    /// Lives inside the endpoint's return-control payload, so it is only
    /// present on agent messages that ask for a tool.
    pub fn correlation_id(&self) -> Option<&str> {
        self.metadata
            .get(RETURN_CONTROL_KEY)?
            .get(INVOCATION_ID_KEY)?
            .as_str()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.metadata.get(SESSION_ID_KEY)?.as_str()
    }

    /// Whether the endpoint marked the session as finished with this reply.
    pub fn ends_session(&self) -> bool {
        self.metadata
            .get(END_SESSION_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn correlation_id_is_read_from_return_control() {
        let mut msg = Message::agent("");
        assert_eq!(msg.correlation_id(), None);

        msg.metadata.insert(
            RETURN_CONTROL_KEY.into(),
            json!({ "invocationId": "inv-1", "invocationInputs": [] }),
        );
        assert_eq!(msg.correlation_id(), Some("inv-1"));
    }

    #[test]
    fn id_is_not_serialized() {
        let msg = Message::human("hi");
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["role"], "human");
        assert!(value.get("metadata").is_none());
    }
}
