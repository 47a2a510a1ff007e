use std::error::Error;

use agent_graph::{
    init_default_tracing,
    observability::langfuse::{self, LangfuseOptions},
    AgentBuilder, ToolBuilder, ToolExecutionError,
};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let public_key = std::env::var("LANGFUSE_PUBLIC_KEY").ok();
    let secret_key = std::env::var("LANGFUSE_SECRET_KEY").ok();
    let host = std::env::var("LANGFUSE_HOST").ok();

    let provider = match (&public_key, &secret_key) {
        (Some(pk), Some(sk)) => Some(langfuse::init(LangfuseOptions {
            public_key: Some(pk.as_str()),
            secret_key: Some(sk.as_str()),
            host: host.as_deref(),
        })?),
        _ => {
            init_default_tracing();
            None
        }
    };

    let mut args = std::env::args().skip(1);
    let base_url = args.next().unwrap_or_else(|| "http://localhost:8080".into());
    let agent_id = args.next().unwrap_or_else(|| "MORTGAGE".into());

    let asset_value = ToolBuilder::new()
        .group("MortgageProcessing")
        .function_name("getAssetValue")
        .function_description("Returns the asset value for an asset holder id")
        .add_required_property("asset_holder_id", "string", "Id of the asset holder")
        .executor_fn(|args: Value| async move {
            let id = args
                .get("asset_holder_id")
                .and_then(Value::as_str)
                .ok_or_else(|| ToolExecutionError::ExecutionFailed("asset_holder_id".into()))?;
            Ok::<String, ToolExecutionError>(format!("The total asset value for {id} is 100K"))
        })
        .build()?;

    let mortgage_rate = ToolBuilder::new()
        .group("MortgageProcessing")
        .function_name("getMortgageRate")
        .function_description("Returns the mortgage rate for an asset holder and asset value")
        .add_required_property("asset_holder_id", "string", "Id of the asset holder")
        .add_required_property("asset_value", "string", "Asset value")
        .executor_fn(|args: Value| async move {
            let value = args
                .get("asset_value")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Ok::<String, ToolExecutionError>(format!("The mortgage rate for an asset value of {value} is 8.87%"))
        })
        .build()?;

    let agent = AgentBuilder::default()
        .set_name("mortgage-agent")
        .set_model("anthropic.claude-3-haiku")
        .set_base_url(base_url)
        .set_agent_id(agent_id)
        .set_instructions("You are a mortgage assistant. Use the tools to answer.")
        .add_tool(asset_value)
        .add_tool(mortgage_rate)
        .build()?;

    let state = agent
        .invoke("What is my mortgage rate for id AVC-1234?")
        .await?;

    for message in state.history() {
        println!("{:?}: {}", message.role, message.content);
    }
    println!("turns: {}", state.turn_count());

    if let Some(provider) = provider {
        if let Err(e) = provider.shutdown() {
            tracing::error!("failed to flush spans: {e}");
        }
    }
    Ok(())
}
