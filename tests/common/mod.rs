#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use agent_graph::{
    AgentEndpoint, AgentReply, AgentRequest, EndpointFuture, InvocationError, Tool, ToolBuilder,
    ToolExecutionError,
};
use serde_json::{Map, Value};

pub const PROMPT: &str = "What is my mortgage rate for id AVC-1234?";

/// Endpoint answering from a fixed script and recording every request.
#[derive(Clone, Default)]
pub struct ScriptedEndpoint {
    replies: Arc<Mutex<VecDeque<Result<AgentReply, InvocationError>>>>,
    requests: Arc<Mutex<Vec<AgentRequest>>>,
}

impl ScriptedEndpoint {
    pub fn new<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = AgentReply>,
    {
        let script = replies.into_iter().map(Ok).collect();
        Self {
            replies: Arc::new(Mutex::new(script)),
            requests: Arc::default(),
        }
    }

    pub fn failing(error: InvocationError) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from([Err(error)]))),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl AgentEndpoint for ScriptedEndpoint {
    fn invoke<'a>(&'a self, request: &'a AgentRequest) -> EndpointFuture<'a> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(InvocationError::Api("script exhausted".into())));
        Box::pin(async move { next })
    }
}

/// Endpoint that asks for `getAssetValue` forever, with a fresh id each time.
#[derive(Clone, Default)]
pub struct EndlessToolCalls {
    calls: Arc<AtomicUsize>,
}

impl AgentEndpoint for EndlessToolCalls {
    fn invoke<'a>(&'a self, _request: &'a AgentRequest) -> EndpointFuture<'a> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            Ok(AgentReply::tool_call(
                "MortgageProcessing::getAssetValue",
                args(&[("asset_holder_id", "AVC-1234")]),
                format!("inv-{n}"),
            ))
        })
    }
}

/// Endpoint that never answers within a short timeout.
pub struct SlowEndpoint(pub std::time::Duration);

impl AgentEndpoint for SlowEndpoint {
    fn invoke<'a>(&'a self, _request: &'a AgentRequest) -> EndpointFuture<'a> {
        let delay = self.0;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(AgentReply::text("too late"))
        })
    }
}

pub fn args(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

pub fn asset_value_tool(counter: Arc<AtomicUsize>) -> Tool {
    ToolBuilder::new()
        .group("MortgageProcessing")
        .function_name("getAssetValue")
        .function_description("Asset value for an asset holder")
        .add_required_property("asset_holder_id", "string", "Holder id")
        .executor_fn(move |args: Value| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let id = args
                    .get("asset_holder_id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ToolExecutionError::ExecutionFailed("no holder id".into()))?;
                Ok::<String, ToolExecutionError>(format!("The total asset value for {id} is 100K"))
            }
        })
        .build()
        .unwrap()
}

pub fn mortgage_rate_tool() -> Tool {
    ToolBuilder::new()
        .group("MortgageProcessing")
        .function_name("getMortgageRate")
        .function_description("Mortgage rate for an asset holder and value")
        .add_required_property("asset_holder_id", "string", "Holder id")
        .add_required_property("asset_value", "string", "Asset value")
        .executor_fn(|args: Value| async move {
            let value = args
                .get("asset_value")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Ok(format!("The mortgage rate for an asset value of {value} is 8.87%"))
        })
        .build()
        .unwrap()
}

pub fn failing_tool() -> Tool {
    ToolBuilder::new()
        .function_name("explode")
        .function_description("Always fails")
        .executor_fn(|_| async { Err(ToolExecutionError::ExecutionFailed("kaboom".into())) })
        .build()
        .unwrap()
}

/// The three replies of the mortgage conversation.
pub fn mortgage_script() -> Vec<AgentReply> {
    vec![
        AgentReply::tool_call(
            "MortgageProcessing::getAssetValue",
            args(&[("asset_holder_id", "AVC-1234")]),
            "inv-1",
        )
        .with_session_token("sess-1"),
        AgentReply::tool_call(
            "MortgageProcessing::getMortgageRate",
            args(&[("asset_holder_id", "AVC-1234"), ("asset_value", "100K")]),
            "inv-2",
        )
        .with_session_token("sess-1"),
        AgentReply::text("Your mortgage rate is 8.87%").with_session_token("sess-1"),
    ]
}
