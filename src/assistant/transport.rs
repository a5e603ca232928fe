use crate::models::chat::{ ChatRequest, ChatResponse };

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid proxy URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Proxy request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Proxy responded with status {0}")]
    Status(u16),
}

/// Carries one chat request to the assistant proxy.
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;
}

pub struct HttpProxyTransport {
    http: HttpClient,
    endpoint: Url,
}

impl HttpProxyTransport {
    /// `base_url` is the proxy origin, e.g. `http://127.0.0.1:4000`.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let endpoint = Url::parse(base_url)?.join("/api/chat")?;
        Ok(Self { http: HttpClient::new(), endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ProxyTransport for HttpProxyTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        debug!("POST {}", self.endpoint);
        let resp = self.http.post(self.endpoint.clone()).json(request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(resp.json::<ChatResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_joined_onto_origin() {
        let transport = HttpProxyTransport::new("http://127.0.0.1:4000").unwrap();
        assert_eq!(transport.endpoint().as_str(), "http://127.0.0.1:4000/api/chat");
    }

    #[test]
    fn rejects_relative_origin() {
        assert!(matches!(HttpProxyTransport::new("localhost"), Err(TransportError::InvalidUrl(_))));
    }
}
