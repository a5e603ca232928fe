use crate::config::prompt::PromptConfig;
use crate::llm::chat::ChatClient;
use crate::models::chat::ChatRequest;

use log::{ debug, error, info };
use std::sync::Arc;
use std::time::Duration;

pub const FALLBACK_REPLY: &str = "I'm having trouble connecting right now. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum ProxyOutcome {
    Reply(String),
    Fallback,
}

impl ProxyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProxyOutcome::Reply(_))
    }

    pub fn into_reply(self) -> String {
        match self {
            ProxyOutcome::Reply(text) => text,
            ProxyOutcome::Fallback => FALLBACK_REPLY.to_string(),
        }
    }
}

/// Stateless adapter between the chat surfaces and the upstream completion provider.
///
/// One call to [`AssistantProxy::answer`] makes exactly one upstream request. Failures are
/// logged and collapsed into [`ProxyOutcome::Fallback`]; nothing is retried.
#[derive(Clone)]
pub struct AssistantProxy {
    chat_client: Arc<dyn ChatClient>,
    prompts: Arc<PromptConfig>,
    upstream_timeout: Duration,
}

impl AssistantProxy {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        prompts: Arc<PromptConfig>,
        upstream_timeout: Duration
    ) -> Self {
        info!(
            "Assistant proxy using {} model={} timeout={:?}",
            chat_client.get_llm_type(),
            chat_client.get_model(),
            upstream_timeout
        );
        Self { chat_client, prompts, upstream_timeout }
    }

    pub fn build_prompt(&self, request: &ChatRequest) -> String {
        self.prompts.assistant_prompt(&request.message, request.language(), request.location())
    }

    pub async fn answer(&self, request: &ChatRequest) -> ProxyOutcome {
        let prompt = self.build_prompt(request);
        debug!(
            "Forwarding chat message ({} chars, language={}, location={})",
            request.message.chars().count(),
            request.language(),
            request.location()
        );

        match tokio::time::timeout(self.upstream_timeout, self.chat_client.complete(&prompt)).await {
            Ok(Ok(resp)) => ProxyOutcome::Reply(resp.response),
            Ok(Err(e)) => {
                error!("Upstream chat provider error: {}", e);
                ProxyOutcome::Fallback
            }
            Err(_) => {
                error!("Upstream chat provider timed out after {:?}", self.upstream_timeout);
                ProxyOutcome::Fallback
            }
        }
    }
}
