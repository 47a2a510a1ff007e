use serde::{Deserialize, Serialize};

use crate::{AgentReply, AgentRequest, ToolCall, ToolResult};

/// Events emitted while an agent drives a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NotificationContent {
    Done(Success, Response),
    ConversationRequest(AgentRequest),
    ConversationSuccess(AgentReply),
    ConversationError(String),
    ToolCallRequest(ToolCall),
    ToolCallSuccess(ToolResult),
    ToolCallError(String),
}

pub type Success = bool;
pub type Response = Option<String>;
