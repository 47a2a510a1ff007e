pub(crate) mod services;
pub mod agent;
pub mod flows;
pub mod notifications;
pub mod observability;
pub mod tools;

pub use flows::*;

pub use tools::*;
pub use agent::models::*;
pub use agent::util::{converse, dispatch_tool};

pub use notifications::*;
pub use services::llm::models::base::{Message, Role};
pub use services::llm::models::chat::{AgentReply, AgentRequest};
pub use services::llm::models::errors::InvocationError;
pub use services::llm::providers::http::{HttpAgentEndpoint, DEFAULT_ALIAS_ID};
pub use services::llm::{
    AgentClient, AgentEndpoint, ClientBuilder, ClientConfig, EndpointFuture, DEFAULT_TIMEOUT,
};
pub use observability::logging::init_default_tracing;
