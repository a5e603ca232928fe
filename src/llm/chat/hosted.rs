use async_trait::async_trait;
use log::info;
use rllm::builder::{ LLMBackend, LLMBuilder };
use rllm::chat::{ ChatMessage, ChatRole, MessageType };
use rllm::LLMProvider;

use super::{ non_empty_reply, ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, LlmError, LlmType };

/// Providers reached through rllm: OpenAI, Anthropic, DeepSeek, Groq and xAI.
pub struct HostedChatClient {
    llm: Box<dyn LLMProvider + Send + Sync>,
    llm_type: LlmType,
    model: String,
    base_url: Option<String>,
}

fn backend_for(llm_type: &LlmType) -> Result<(LLMBackend, &'static str, &'static str), LlmError> {
    match llm_type {
        LlmType::OpenAI => Ok((LLMBackend::OpenAI, "OpenAI", "gpt-4o-mini")),
        LlmType::Anthropic => Ok((LLMBackend::Anthropic, "Anthropic", "claude-3-5-haiku-latest")),
        LlmType::DeepSeek => Ok((LLMBackend::DeepSeek, "DeepSeek", "deepseek-chat")),
        LlmType::Groq => Ok((LLMBackend::Groq, "Groq", "llama-3.1-8b-instant")),
        LlmType::XAI => Ok((LLMBackend::XAI, "xAI", "grok-2-latest")),
        other => Err(LlmError::UnsupportedProvider(other.to_string())),
    }
}

impl HostedChatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let (backend, label, default_model) = backend_for(&config.llm_type)?;
        let api_key = config.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingApiKey(label))?;
        let chat_model = config.completion_model
            .clone()
            .unwrap_or_else(|| default_model.to_string());

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .api_key(api_key)
            .model(&chat_model)
            .stream(false);

        if let Some(url) = &config.base_url {
            builder = builder.base_url(url);
        }
        if let Some(tokens) = config.max_tokens {
            builder = builder.max_tokens(tokens);
        }
        if let Some(temp) = config.temperature {
            builder = builder.temperature(temp);
        }

        let llm = builder.build().map_err(|e| LlmError::Provider(e.to_string()))?;

        Ok(Self {
            llm,
            llm_type: config.llm_type.clone(),
            model: chat_model,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl ChatClient for HostedChatClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, LlmError> {
        let messages = vec![ChatMessage {
            role: ChatRole::User,
            content: prompt.to_string(),
            message_type: MessageType::Text,
        }];
        info!(
            "HostedChatClient::complete() → provider={} model={} base_url={:?}",
            self.llm_type,
            self.model,
            self.base_url
        );
        let resp = self.llm
            .chat(&messages).await
            .map_err(|e| LlmError::Provider(e.to_string()))?;
        let text = resp
            .text()
            .map(|s| s.to_string())
            .unwrap_or_else(|| resp.to_string());
        non_empty_reply(text)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        self.base_url.clone()
    }

    fn get_llm_type(&self) -> LlmType {
        self.llm_type.clone()
    }
}
