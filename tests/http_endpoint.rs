mod common;

use std::collections::HashMap;

use agent_graph::{
    AgentBuilder, AgentEndpoint, AgentError, AgentReply, AgentRequest, ClientBuilder,
    ClientConfig, ConversationState, HttpAgentEndpoint, InvocationError,
};
use common::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INVOKE_PATH: &str = "/agents/MORTGAGE/aliases/TSTALIASID/invoke";

fn endpoint_for(server: &MockServer) -> HttpAgentEndpoint {
    let cfg = ClientConfig::default()
        .base_url(Some(server.uri()))
        .agent_id(Some("MORTGAGE"));
    HttpAgentEndpoint::new(cfg).unwrap()
}

fn request(prompt: &str) -> AgentRequest {
    AgentRequest {
        config: Default::default(),
        session_token: None,
        messages: ConversationState::from_prompt(prompt).history().to_vec(),
        tool_result: None,
    }
}

#[tokio::test]
async fn completion_reply_is_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .and(body_partial_json(json!({ "inputText": PROMPT })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "completion": "Your rate is 8.87%",
            "sessionId": "sess-1",
            "endSession": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = endpoint_for(&server).invoke(&request(PROMPT)).await.unwrap();

    assert_eq!(reply.content, "Your rate is 8.87%");
    assert_eq!(reply.session_token.as_deref(), Some("sess-1"));
    assert!(reply.end_session);
    assert!(reply.tool_call.is_none());
}

#[tokio::test]
async fn error_status_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("throttled"))
        .mount(&server)
        .await;

    let err = endpoint_for(&server).invoke(&request(PROMPT)).await.unwrap_err();
    assert!(matches!(err, InvocationError::Api(ref m) if m.contains("throttled")));
}

#[tokio::test]
async fn undecodable_body_is_a_serialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = endpoint_for(&server).invoke(&request(PROMPT)).await.unwrap_err();
    assert!(matches!(err, InvocationError::Serialization(_)));
}

#[tokio::test]
async fn extra_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .and(header("x-tenant", "bank"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "completion": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HashMap::new();
    headers.insert("x-tenant".to_string(), "bank".to_string());
    let cfg = ClientConfig::default()
        .base_url(Some(server.uri()))
        .agent_id(Some("MORTGAGE"))
        .extra_headers(Some(headers));

    let reply: AgentReply = HttpAgentEndpoint::new(cfg)
        .unwrap()
        .invoke(&request(PROMPT))
        .await
        .unwrap();
    assert_eq!(reply.content, "ok");
}

#[tokio::test]
async fn tool_round_trip_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .and(body_partial_json(json!({ "inputText": PROMPT })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "completion": "",
            "sessionId": "sess-1",
            "returnControl": {
                "invocationId": "inv-1",
                "invocationInputs": [{
                    "functionInvocationInput": {
                        "actionGroup": "MortgageProcessing",
                        "function": "getAssetValue",
                        "parameters": [
                            { "name": "asset_holder_id", "type": "string", "value": "AVC-1234" }
                        ]
                    }
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .and(body_partial_json(json!({
            "sessionId": "sess-1",
            "sessionState": { "invocationId": "inv-1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "completion": "Your assets are worth 100K",
            "sessionId": "sess-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let counter = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let agent = AgentBuilder::default()
        .set_model("test-model")
        .set_base_url(server.uri())
        .set_agent_id("MORTGAGE")
        .add_tool(asset_value_tool(counter))
        .build()
        .unwrap();

    let state = agent.invoke(PROMPT).await.unwrap();
    assert_eq!(state.last_reply(), Some("Your assets are worth 100K"));
    assert_eq!(state.turn_count(), 3);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);

    let second: Value = serde_json::from_slice(&received[1].body).unwrap();
    assert!(second.get("inputText").is_none());
    let result = &second["sessionState"]["returnControlInvocationResults"][0]["functionResult"];
    assert_eq!(result["actionGroup"], json!("MortgageProcessing"));
    assert_eq!(result["function"], json!("getAssetValue"));
    assert_eq!(
        result["responseBody"]["TEXT"]["body"],
        json!("The total asset value for AVC-1234 is 100K")
    );
}

#[tokio::test]
async fn unreachable_runtime_fails_the_run() {
    let agent = AgentBuilder::default()
        .set_model("test-model")
        .set_base_url("http://127.0.0.1:9")
        .set_agent_id("MORTGAGE")
        .build()
        .unwrap();

    let err = agent.invoke(PROMPT).await.unwrap_err();
    assert!(matches!(
        err,
        AgentError::Invocation(InvocationError::Request(_) | InvocationError::Timeout(_))
    ));
}
