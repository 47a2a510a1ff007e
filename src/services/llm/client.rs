use std::{fmt, future::Future, pin::Pin, sync::Arc, time::Duration};

use crate::{
    services::llm::models::{
        chat::{AgentReply, AgentRequest},
        errors::InvocationError,
    },
    ClientConfig,
};

use super::providers::http::HttpAgentEndpoint;

pub type EndpointFuture<'a> =
    Pin<Box<dyn Future<Output = Result<AgentReply, InvocationError>> + Send + 'a>>;

/// Anything that can answer a conversation turn.
///
/// The hosted runtime is reached through [`HttpAgentEndpoint`]; other
/// implementations (scripted replies in tests, in-process agents) plug in
/// through [`AgentClient::from_endpoint`].
pub trait AgentEndpoint: Send + Sync {
    fn invoke<'a>(&'a self, request: &'a AgentRequest) -> EndpointFuture<'a>;
}

#[derive(Clone)]
enum ClientInner {
    Http(HttpAgentEndpoint),
    Custom(Arc<dyn AgentEndpoint>),
}

impl fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientInner::Http(c) => f.debug_tuple("Http").field(c).finish(),
            ClientInner::Custom(_) => f.write_str("Custom(<endpoint>)"),
        }
    }
}

/// Handle on the agent endpoint, bounding every call by a timeout.
#[derive(Clone, Debug)]
pub struct AgentClient {
    config: ClientConfig,
    inner: Arc<ClientInner>,
}

impl AgentClient {
    pub fn from_endpoint<E>(endpoint: E, config: ClientConfig) -> Self
    where
        E: AgentEndpoint + 'static,
    {
        Self::from_shared(Arc::new(endpoint), config)
    }

    pub fn from_shared(endpoint: Arc<dyn AgentEndpoint>, config: ClientConfig) -> Self {
        Self {
            config,
            inner: Arc::new(ClientInner::Custom(endpoint)),
        }
    }

    pub fn get_config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        self.config.effective_timeout()
    }

    /// Send one request; expiry of the timeout is an [`InvocationError::Timeout`].
    pub async fn invoke(&self, request: &AgentRequest) -> Result<AgentReply, InvocationError> {
        let call = match &*self.inner {
            ClientInner::Http(c) => c.invoke(request),
            ClientInner::Custom(c) => c.invoke(request),
        };

        let timeout = self.timeout();
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(InvocationError::Timeout(timeout)),
        }
    }
}

impl TryFrom<ClientConfig> for AgentClient {
    type Error = InvocationError;

    fn try_from(cfg: ClientConfig) -> Result<Self, Self::Error> {
        let config = cfg.clone();
        let inner = ClientInner::Http(HttpAgentEndpoint::new(cfg)?);
        Ok(Self {
            config,
            inner: Arc::new(inner),
        })
    }
}
