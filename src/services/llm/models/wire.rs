//! JSON shapes exchanged with the hosted agent runtime over HTTP.
//!
//! The reply embeds tool-call requests inside an opaque `returnControl`
//! payload. Only the fields needed to dispatch a tool are decoded; the raw
//! payload is kept on the message metadata so the correlation id travels
//! with it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::{
    services::llm::models::{
        base::{RETURN_CONTROL_KEY, SESSION_ID_KEY, TRACE_KEY},
        chat::{AgentReply, AgentRequest},
        errors::InvocationError,
    },
    Message, Role, ToolCall, ToolDeclaration,
};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InvokeAgentBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub enable_trace: bool,
    pub end_session: bool,
    pub model: String,
    pub instructions: String,
    pub messages: Vec<WireMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_state: Option<SessionState>,
}

/// History entry as the runtime sees it. Local message ids stay local.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireMessage {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl From<&Message> for WireMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
            tool_call: msg.tool_call.clone(),
            metadata: msg.metadata.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub invocation_id: String,
    pub return_control_invocation_results: Vec<InvocationResult>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub function_result: FunctionResult,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResult {
    pub action_group: String,
    pub function: String,
    pub response_body: ResponseBody,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseBody {
    #[serde(rename = "TEXT")]
    pub text: TextBody,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextBody {
    pub body: String,
}

impl From<&AgentRequest> for InvokeAgentBody {
    fn from(req: &AgentRequest) -> Self {
        let session_state = req.tool_result.as_ref().map(|result| SessionState {
            invocation_id: result.correlation_id.clone(),
            return_control_invocation_results: vec![InvocationResult {
                function_result: FunctionResult {
                    action_group: result.namespace.clone(),
                    function: result.function.clone(),
                    response_body: ResponseBody {
                        text: TextBody {
                            body: result.body.clone(),
                        },
                    },
                },
            }],
        });

        // the runtime ignores input text while it is waiting on a tool result
        let input_text = match session_state {
            Some(_) => None,
            None => req.latest_human_text().map(str::to_owned),
        };

        Self {
            input_text,
            session_id: req.session_token.clone(),
            enable_trace: req.config.enable_trace,
            end_session: false,
            model: req.config.model.clone(),
            instructions: req.config.instructions.clone(),
            messages: req.messages.iter().map(WireMessage::from).collect(),
            tools: req.config.tools.clone(),
            session_state,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct InvokeAgentResponse {
    #[serde(default)]
    pub completion: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub end_session: bool,
    #[serde(default)]
    pub trace: Option<Value>,
    #[serde(default)]
    pub return_control: Option<Value>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct ReturnControlPayload {
    #[allow(dead_code)]
    #[serde(default)]
    invocation_id: Option<String>,
    #[serde(default)]
    invocation_inputs: Vec<InvocationInput>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct InvocationInput {
    #[serde(default)]
    function_invocation_input: Option<FunctionInvocationInput>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct FunctionInvocationInput {
    #[serde(default)]
    action_group: String,
    function: String,
    #[serde(default)]
    parameters: Vec<Parameter>,
}

#[derive(Deserialize, Debug, Clone)]
struct Parameter {
    name: String,
    #[serde(default, rename = "type")]
    param_type: String,
    #[serde(default)]
    value: String,
}

impl TryFrom<InvokeAgentResponse> for AgentReply {
    type Error = InvocationError;

    fn try_from(resp: InvokeAgentResponse) -> Result<Self, Self::Error> {
        let mut metadata = Map::new();
        if let Some(session_id) = &resp.session_id {
            metadata.insert(SESSION_ID_KEY.into(), Value::String(session_id.clone()));
        }
        if let Some(trace) = resp.trace {
            metadata.insert(TRACE_KEY.into(), trace);
        }

        let mut tool_call = None;
        if let Some(raw) = resp.return_control {
            let payload: ReturnControlPayload = serde_json::from_value(raw.clone())
                .map_err(|e| {
                    InvocationError::Serialization(format!("Malformed returnControl payload: {e}"))
                })?;

            let mut inputs = payload
                .invocation_inputs
                .into_iter()
                .filter_map(|i| i.function_invocation_input);

            if let Some(input) = inputs.next() {
                tool_call = Some(input.into_tool_call());
            }
            if inputs.next().is_some() {
                tracing::warn!("reply requested several tools at once, only the first is dispatched");
            }
            metadata.insert(RETURN_CONTROL_KEY.into(), raw);
        }

        Ok(AgentReply {
            content: resp.completion,
            tool_call,
            session_token: resp.session_id,
            end_session: resp.end_session,
            metadata,
        })
    }
}

impl FunctionInvocationInput {
    fn into_tool_call(self) -> ToolCall {
        let name = if self.action_group.is_empty() {
            self.function
        } else {
            format!("{}::{}", self.action_group, self.function)
        };

        let arguments: Map<String, Value> = self
            .parameters
            .into_iter()
            .map(|p| {
                let value = coerce_parameter(&p.param_type, p.value);
                (p.name, value)
            })
            .collect();

        ToolCall::new(name, arguments)
    }
}

/// Parameters arrive as strings tagged with their declared type.
fn coerce_parameter(param_type: &str, raw: String) -> Value {
    let parsed = match param_type {
        "integer" => raw.trim().parse::<i64>().ok().map(Value::from),
        "number" => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        "boolean" => raw.trim().parse::<bool>().ok().map(Value::Bool),
        "array" | "object" => serde_json::from_str::<Value>(&raw).ok(),
        _ => None,
    };
    parsed.unwrap_or(Value::String(raw))
}
