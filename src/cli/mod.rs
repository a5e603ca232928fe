use clap::Parser;

use crate::llm::{ LlmConfig, LlmError };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Travel assistant proxy and safety data API", long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (gemini, ollama, openai, anthropic, deepseek, groq, xai)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "gemini")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API (e.g., http://localhost:11434 for Ollama)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider. Falls back to GEMINI_API_KEY.
    #[arg(long, env = "CHAT_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    #[arg(long, env = "GEMINI_API_KEY", default_value = "", hide = true, hide_env_values = true)]
    pub gemini_api_key: String,

    /// Model name for chat completion (e.g., gemini-1.5-flash, llama3.2, gpt-4o-mini)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Upper bound on generated tokens, passed to the provider when set.
    #[arg(long, env = "CHAT_MAX_TOKENS")]
    pub chat_max_tokens: Option<u32>,

    /// Sampling temperature, passed to the provider when set.
    #[arg(long, env = "CHAT_TEMPERATURE")]
    pub chat_temperature: Option<f32>,

    /// Seconds to wait for the upstream provider before answering with the fallback reply.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "30")]
    pub upstream_timeout_secs: u64,

    // --- General App Args ---
    /// Optional JSON file overriding the assistant prompt template.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    pub fn chat_api_key(&self) -> Option<String> {
        [&self.chat_api_key, &self.gemini_api_key]
            .into_iter()
            .find(|k| !k.trim().is_empty())
            .cloned()
    }

    pub fn llm_config(&self) -> Result<LlmConfig, LlmError> {
        Ok(LlmConfig {
            llm_type: self.chat_llm_type.parse()?,
            api_key: self.chat_api_key(),
            completion_model: self.chat_model.clone().filter(|m| !m.trim().is_empty()),
            base_url: self.chat_base_url.clone().filter(|u| !u.trim().is_empty()),
            max_tokens: self.chat_max_tokens,
            temperature: self.chat_temperature,
        })
    }
}

/// Terminal client for the assistant proxy.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Chat with the travel assistant from a terminal", long_about = None)]
pub struct ChatArgs {
    /// Origin of a running travel-guardian server.
    #[arg(long, env = "PROXY_URL", default_value = "http://127.0.0.1:4000")]
    pub proxy_url: String,

    /// Seconds to wait for a reply before giving up on the turn.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    /// Use the floating-widget profile instead of the full chat page.
    #[arg(long, default_value = "false")]
    pub widget: bool,

    /// Initial response language (full chat only).
    #[arg(long, env = "CHAT_LANGUAGE")]
    pub language: Option<String>,

    /// Initial location sent with each question.
    #[arg(long, env = "CHAT_LOCATION")]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmType;

    #[test]
    fn defaults_target_gemini() {
        let args = Args::try_parse_from(["travel-guardian"]).unwrap();
        assert_eq!(args.server_addr, "127.0.0.1:4000");
        assert_eq!(args.upstream_timeout_secs, 30);
        let config = args.llm_config().unwrap();
        assert_eq!(config.llm_type, LlmType::Gemini);
        assert_eq!(config.completion_model, None);
    }

    #[test]
    fn chat_key_takes_precedence_over_gemini_key() {
        let args = Args::try_parse_from([
            "travel-guardian",
            "--chat-api-key",
            "primary",
            "--gemini-api-key",
            "secondary",
        ]).unwrap();
        assert_eq!(args.chat_api_key().as_deref(), Some("primary"));
    }

    #[test]
    fn invalid_provider_is_reported() {
        let args = Args::try_parse_from(["travel-guardian", "--chat-llm-type", "bard"]).unwrap();
        assert!(args.llm_config().is_err());
    }

    #[test]
    fn chat_args_default_to_full_page() {
        let args = ChatArgs::try_parse_from(["travel-guardian-chat"]).unwrap();
        assert!(!args.widget);
        assert_eq!(args.proxy_url, "http://127.0.0.1:4000");
    }
}
