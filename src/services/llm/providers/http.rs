use std::fmt;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde::de::DeserializeOwned;
use tracing::{error, span, Instrument, Level, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::services::llm::models::{
    chat::{AgentReply, AgentRequest},
    errors::InvocationError,
    wire::{InvokeAgentBody, InvokeAgentResponse},
};
use crate::services::llm::{AgentEndpoint, EndpointFuture};
use crate::ClientConfig;

/// Alias addressed when none is configured: the agent's working draft.
pub const DEFAULT_ALIAS_ID: &str = "TSTALIASID";

/// Agent runtime reached over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpAgentEndpoint {
    pub client: Client,
    pub base_url: String,
    pub agent_id: String,
    pub alias_id: String,
}

impl HttpAgentEndpoint {
    pub fn new(cfg: ClientConfig) -> Result<Self, InvocationError> {
        let Some(base_url) = cfg.base_url.clone() else {
            return Err(InvocationError::Config("Agent runtime base_url not set".into()));
        };
        let Some(agent_id) = cfg.agent_id.clone().filter(|id| !id.is_empty()) else {
            return Err(InvocationError::Config("Agent id not set".into()));
        };
        let alias_id = cfg.alias_id.clone().unwrap_or_else(|| DEFAULT_ALIAS_ID.into());

        let mut headers = HeaderMap::new();
        if let Some(extra) = &cfg.extra_headers {
            for (k, v) in extra {
                let name = HeaderName::from_bytes(k.as_bytes())
                    .map_err(|e| InvocationError::Config(format!("Invalid header name {k}: {e}")))?;
                let value = HeaderValue::from_str(v)
                    .map_err(|e| InvocationError::Config(format!("Invalid header value for {k}: {e}")))?;
                headers.insert(name, value);
            }
        }

        let client = Client::builder()
            .timeout(cfg.effective_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| InvocationError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            agent_id,
            alias_id,
        })
    }

    pub fn invoke_path(&self) -> String {
        format!("/agents/{}/aliases/{}/invoke", self.agent_id, self.alias_id)
    }

    async fn post<T, R>(&self, endpoint: &str, request_body: &T) -> Result<R, InvocationError>
    where
        T: serde::Serialize + fmt::Debug,
        R: DeserializeOwned + fmt::Debug,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        let span = span!(
            Level::INFO,
            "Agent HTTP Request",
            "langfuse.observation.name" = format!("POST {}", endpoint).as_str(),
            "langfuse.observation.type" = "span",
            "http.request.method" = "POST",
            "url.full" = url.as_str(),
            "server.address" = self.base_url.as_str(),
        );

        if let Ok(body) = serde_json::to_string(request_body) {
            span.set_attribute("langfuse.observation.input", body);
        }

        async {
            let response = self
                .client
                .post(&url)
                .json(request_body)
                .send()
                .await
                .map_err(|e| {
                    Span::current().set_status(opentelemetry::trace::Status::Error {
                        description: e.to_string().into(),
                    });
                    InvocationError::from(e)
                })?;

            let status = response.status();

            Span::current().set_attribute("http.response.status_code", status.as_u16() as i64);

            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read error body".into());

                error!(%status, body = %error_text, "request failed");

                Span::current().set_status(opentelemetry::trace::Status::Error {
                    description: format!("HTTP {}", status).into(),
                });
                Span::current()
                    .set_attribute("langfuse.observation.status_message", error_text.clone());

                return Err(InvocationError::Api(format!(
                    "Agent request failed: {status} - {error_text}"
                )));
            }

            let response_text = response.text().await.map_err(|e| {
                InvocationError::Request(format!("Failed to read response text: {e}"))
            })?;

            Span::current().set_attribute("langfuse.observation.output", response_text.clone());

            match serde_json::from_str::<R>(&response_text) {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    error!(%e, raw = %response_text, "deserialization error");
                    Span::current().set_status(opentelemetry::trace::Status::Error {
                        description: "Deserialization Error".into(),
                    });
                    Err(InvocationError::Serialization(format!(
                        "Error decoding response body: {e}. Raw JSON was: '{response_text}'"
                    )))
                }
            }
        }
        .instrument(span)
        .await
    }

    pub async fn invoke_agent(&self, request: &AgentRequest) -> Result<AgentReply, InvocationError> {
        let body = InvokeAgentBody::from(request);
        let response: InvokeAgentResponse = self.post(&self.invoke_path(), &body).await?;
        AgentReply::try_from(response)
    }
}

impl AgentEndpoint for HttpAgentEndpoint {
    fn invoke<'a>(&'a self, request: &'a AgentRequest) -> EndpointFuture<'a> {
        Box::pin(self.invoke_agent(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientBuilder;

    #[test]
    fn missing_agent_id_is_a_config_error() {
        let cfg = ClientConfig::default().base_url(Some("http://localhost:8080"));
        let err = HttpAgentEndpoint::new(cfg).unwrap_err();
        assert!(matches!(err, InvocationError::Config(_)));
    }

    #[test]
    fn invoke_path_defaults_alias() {
        let cfg = ClientConfig::default()
            .base_url(Some("http://localhost:8080/"))
            .agent_id(Some("AGENT1"));
        let endpoint = HttpAgentEndpoint::new(cfg).unwrap();
        assert_eq!(endpoint.base_url, "http://localhost:8080");
        assert_eq!(endpoint.invoke_path(), "/agents/AGENT1/aliases/TSTALIASID/invoke");
    }

    #[test]
    fn invalid_extra_header_is_rejected() {
        let mut headers = std::collections::HashMap::new();
        headers.insert("bad header".to_string(), "x".to_string());
        let cfg = ClientConfig::default()
            .base_url(Some("http://localhost:8080"))
            .agent_id(Some("AGENT1"))
            .extra_headers(Some(headers));
        assert!(matches!(
            HttpAgentEndpoint::new(cfg),
            Err(InvocationError::Config(_))
        ));
    }
}
