use serde::{Deserialize, Serialize};

use crate::ConversationState;

/// Where the conversation stands after an agent turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// A tool call is outstanding, or a tool result still has to be delivered.
    NeedsToolResult,
    /// The agent answered; the session stays open for another human turn.
    AwaitingUserTurn,
    /// The endpoint closed the session.
    Done,
}

/// Binary decision the control loop acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Stop,
}

impl Route {
    pub fn signal(self) -> Signal {
        match self {
            Route::NeedsToolResult => Signal::Continue,
            Route::AwaitingUserTurn | Route::Done => Signal::Stop,
        }
    }
}

/// Decide whether the loop dispatches a tool or terminates. Pure.
pub fn route(state: &ConversationState) -> Route {
    if state.pending_input().is_some() || state.has_open_tool_call() {
        return Route::NeedsToolResult;
    }
    match state.last_message() {
        Some(last) if last.ends_session() => Route::Done,
        _ => Route::AwaitingUserTurn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentReply, ToolResult};
    use serde_json::Map;

    #[test]
    fn final_answer_stops() {
        let mut state = ConversationState::from_prompt("rate?");
        state.append(AgentReply::text("4.5%").into_message());
        assert_eq!(route(&state), Route::AwaitingUserTurn);
        assert_eq!(route(&state).signal(), Signal::Stop);
    }

    #[test]
    fn tool_call_continues() {
        let mut state = ConversationState::from_prompt("rate?");
        state.append(AgentReply::tool_call("Bank::getAssetValue", Map::new(), "inv-1").into_message());
        assert_eq!(route(&state), Route::NeedsToolResult);
        assert_eq!(route(&state).signal(), Signal::Continue);
    }

    #[test]
    fn pending_input_continues() {
        let mut state = ConversationState::from_prompt("rate?");
        state.append(AgentReply::text("").into_message());
        state.set_pending_input(ToolResult {
            correlation_id: "inv-1".into(),
            namespace: "Bank".into(),
            function: "getAssetValue".into(),
            body: "300000".into(),
        });
        assert_eq!(route(&state), Route::NeedsToolResult);
    }

    #[test]
    fn ended_session_is_done() {
        let mut state = ConversationState::from_prompt("bye");
        state.append(AgentReply::text("goodbye").ending_session().into_message());
        assert_eq!(route(&state), Route::Done);
        assert_eq!(route(&state).signal(), Signal::Stop);
    }

    #[test]
    fn repeated_tool_call_still_continues() {
        let mut state = ConversationState::from_prompt("rate?");
        state.append(AgentReply::tool_call("getAssetValue", Map::new(), "inv-1").into_message());
        state.mark_dispatched("inv-1");
        assert_eq!(route(&state), Route::NeedsToolResult);
    }
}
