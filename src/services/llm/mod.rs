pub mod client;
pub mod client_config;
pub mod models;
pub mod providers;

pub use client::{AgentClient, AgentEndpoint, EndpointFuture};
pub use client_config::{ClientBuilder, ClientConfig, DEFAULT_TIMEOUT};
pub use models::*;
