pub mod http;

pub use http::HttpAgentEndpoint;
