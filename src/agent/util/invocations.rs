use tracing::instrument;

use crate::{
    split_tool_name, Agent, AgentError, AgentRequest, ConversationState, Message,
    NotificationHandler, ToolCall, ToolExecutionError, ToolResult,
};

/// Run one conversation turn against the agent endpoint.
///
/// Sends the full history together with the pending tool result, if any,
/// under a freshly built [`AgentConfig`](crate::AgentConfig). `user_text`
/// becomes a new human message, unless a tool result is waiting to be
/// delivered, in which case it is dropped.
///
/// The state is only touched once a reply has arrived: on failure the
/// history, pending input, session token and turn count are exactly as
/// they were before the call.
#[instrument(level = "debug", skip_all, fields(agent_name = %agent.name, turn = state.turn_count()))]
pub async fn converse(
    agent: &Agent,
    state: &mut ConversationState,
    user_text: Option<String>,
) -> Result<Message, AgentError> {
    let tool_result = state.pending_input().cloned();

    let human = match (user_text, &tool_result) {
        (Some(text), None) => Some(Message::human(text)),
        (Some(_), Some(pending)) => {
            tracing::warn!(
                correlation_id = %pending.correlation_id,
                "user text ignored while a tool result is pending"
            );
            None
        }
        (None, _) => None,
    };

    let mut messages = state.history().to_vec();
    if let Some(msg) = &human {
        messages.push(msg.clone());
    }

    let request = AgentRequest {
        config: agent.agent_config(),
        session_token: state.session_token().map(str::to_owned),
        messages,
        tool_result,
    };

    agent.notify_conversation_request(request.clone()).await;

    let reply = match agent.client.invoke(&request).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, "agent invocation failed");
            agent.notify_conversation_error(e.to_string()).await;
            return Err(e.into());
        }
    };

    agent.notify_conversation_success(reply.clone()).await;

    if let Some(msg) = human {
        state.append(msg);
    }
    if let Some(delivered) = state.take_pending_input() {
        tracing::debug!(correlation_id = %delivered.correlation_id, "tool result delivered");
    }
    if let Some(token) = reply.session_token.as_deref() {
        state.record_session_token(token);
    }

    let message = reply.into_message();
    state.append(message.clone());
    state.bump_turn();

    Ok(message)
}

/// Execute the tool requested by the latest message, if any.
///
/// On success the result is stored as the state's pending input and
/// returned. Every failure (no correlation id, unknown tool, argument
/// mismatch, error raised by the tool) is logged and reported as a
/// notification, and leaves pending input unset. A request whose
/// correlation id was already dispatched is skipped.
///
/// The turn counter advances whatever the outcome.
#[instrument(level = "debug", skip_all, fields(agent_name = %agent.name, turn = state.turn_count()))]
pub async fn dispatch_tool(agent: &Agent, state: &mut ConversationState) -> Option<ToolResult> {
    state.bump_turn();

    let (call, correlation_id) = {
        let last = state.last_message()?;
        let Some(call) = last.tool_call.clone() else {
            tracing::debug!("latest message carries no tool call");
            return None;
        };
        (call, last.correlation_id().map(str::to_owned))
    };

    let Some(correlation_id) = correlation_id else {
        absorb(agent, &call, ToolExecutionError::MissingCorrelationId).await;
        return None;
    };

    if !state.mark_dispatched(&correlation_id) {
        tracing::warn!(
            target: "tool",
            tool = %call.name,
            correlation_id = %correlation_id,
            "tool call already dispatched, skipping",
        );
        return None;
    }

    let (namespace, key) = split_tool_name(&call.name);

    tracing::info!(
        target: "tool",
        tool = %call.name,
        namespace,
        key,
        correlation_id = %correlation_id,
        args = ?call.arguments,
        "executing tool call",
    );

    let Some(tool) = agent.tools.get(key) else {
        absorb(agent, &call, ToolExecutionError::UnregisteredTool(key.to_string())).await;
        return None;
    };

    agent.notify_tool_request(call.clone()).await;

    let body = match tool.execute(call.arguments.clone()).await {
        Ok(body) => body,
        Err(e) => {
            absorb(agent, &call, e).await;
            return None;
        }
    };

    let result = ToolResult {
        correlation_id,
        namespace: namespace.to_string(),
        function: key.to_string(),
        body,
    };

    agent.notify_tool_success(result.clone()).await;
    state.set_pending_input(result.clone());

    Some(result)
}

async fn absorb(agent: &Agent, call: &ToolCall, error: ToolExecutionError) {
    tracing::error!(target: "tool", tool = %call.name, error = %error, "tool call failed");
    agent.notify_tool_error(error.to_string()).await;
}
