use tracing::instrument;

use crate::{
    converse, dispatch_tool, route, Agent, AgentError, ConversationState, NotificationHandler,
    Route, Signal,
};

/// Default cap on conversation turns per run.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// States of the conversation control loop.
///
/// | from         | condition       | to           |
/// |--------------|-----------------|--------------|
/// | Conversation | route: Continue | ToolDispatch |
/// | Conversation | route: Stop     | Terminated   |
/// | ToolDispatch | always          | Conversation |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Conversation,
    ToolDispatch,
    Terminated,
}

impl LoopState {
    pub fn next(self, route: Route) -> LoopState {
        match self {
            LoopState::Conversation => match route.signal() {
                Signal::Continue => LoopState::ToolDispatch,
                Signal::Stop => LoopState::Terminated,
            },
            LoopState::ToolDispatch => LoopState::Conversation,
            LoopState::Terminated => LoopState::Terminated,
        }
    }
}

/// Drive `state` from the entry step until the loop terminates.
///
/// Returns the route that stopped the loop. Fails with
/// [`AgentError::MaxIterationsExceeded`] when the agent keeps asking for
/// tools past the agent's iteration cap, and with
/// [`AgentError::Invocation`] as soon as an endpoint call fails.
#[instrument(level = "debug", skip_all, fields(agent_name = %agent.name))]
pub async fn run_conversation_loop(
    agent: &Agent,
    state: &mut ConversationState,
) -> Result<Route, AgentError> {
    let mut current = LoopState::Conversation;
    let mut last_route = route(state);
    let mut iterations = 0usize;

    loop {
        match current {
            LoopState::Conversation => {
                if iterations >= agent.max_iterations {
                    tracing::error!(max = agent.max_iterations, "conversation loop did not settle");
                    agent.notify_done(false, state.last_reply().map(str::to_owned)).await;
                    return Err(AgentError::MaxIterationsExceeded(agent.max_iterations));
                }
                iterations += 1;

                if let Err(e) = converse(agent, state, None).await {
                    agent.notify_done(false, None).await;
                    return Err(e);
                }
                last_route = route(state);
                tracing::debug!(?last_route, iterations, "conversation turn finished");
            }
            LoopState::ToolDispatch => {
                dispatch_tool(agent, state).await;
            }
            LoopState::Terminated => {
                agent
                    .notify_done(true, state.last_reply().map(str::to_owned))
                    .await;
                return Ok(last_route);
            }
        }
        current = current.next(last_route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        use LoopState::*;
        assert_eq!(Conversation.next(Route::NeedsToolResult), ToolDispatch);
        assert_eq!(Conversation.next(Route::AwaitingUserTurn), Terminated);
        assert_eq!(Conversation.next(Route::Done), Terminated);
        assert_eq!(ToolDispatch.next(Route::AwaitingUserTurn), Conversation);
        assert_eq!(ToolDispatch.next(Route::NeedsToolResult), Conversation);
        assert_eq!(Terminated.next(Route::NeedsToolResult), Terminated);
    }
}
