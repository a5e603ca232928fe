use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use log::info;
use thiserror::Error;

pub const DEFAULT_ASSISTANT_TEMPLATE: &str = "
You are a helpful travel assistant for tourists. You specialize in:
- Local food recommendations
- Safety guidance
- Cultural tips
- Emergency information
- Language barriers help

Current location: {location}
Response language: {language}

User question: {message}

Please respond in {language} and provide practical, safety-focused advice for tourists.
Keep responses concise but helpful (max 200 words).
";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt template '{0}' is missing the {{message}} placeholder")]
    MissingPlaceholder(String),
    #[error("Prompt file IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Prompt JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PromptConfig {
    #[serde(default = "default_assistant_template")]
    pub assistant_template: String,
}

fn default_assistant_template() -> String {
    DEFAULT_ASSISTANT_TEMPLATE.to_string()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { assistant_template: default_assistant_template() }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        if !self.assistant_template.contains("{message}") {
            return Err(PromptError::MissingPlaceholder("assistant_template".to_string()));
        }
        Ok(())
    }

    /// Fills the envelope in one left-to-right pass; inserted values are never re-scanned
    /// for placeholders.
    pub fn assistant_prompt(&self, message: &str, language: &str, location: &str) -> String {
        let placeholders = [("{location}", location), ("{language}", language), ("{message}", message)];
        let mut out = String::with_capacity(self.assistant_template.len() + message.len());
        let mut rest = self.assistant_template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            match placeholders.iter().find(|(token, _)| tail.starts_with(token)) {
                Some((token, value)) => {
                    out.push_str(value);
                    rest = &tail[token.len()..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<Arc<PromptConfig>, PromptError> {
    let path = path.as_ref();
    let file_content = fs::read_to_string(path)?;
    let config: PromptConfig = serde_json::from_str(&file_content)?;
    config.validate()?;
    info!("Loaded assistant prompt template from {}", path.display());
    Ok(Arc::new(config))
}

/// Uses the prompts file when one is configured, otherwise the built-in template.
pub fn resolve_prompts(path: Option<&str>) -> Result<Arc<PromptConfig>, PromptError> {
    match path.filter(|p| !p.trim().is_empty()) {
        Some(p) => load_prompts(p),
        None => Ok(Arc::new(PromptConfig::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_envelope_embeds_context() {
        let prompt = PromptConfig::default().assistant_prompt(
            "Is this area safe at night?",
            "French",
            "Lyon"
        );
        assert!(prompt.contains("You are a helpful travel assistant for tourists."));
        assert!(prompt.contains("Current location: Lyon\n"));
        assert!(prompt.contains("Response language: French\n"));
        assert!(prompt.contains("User question: Is this area safe at night?\n"));
        assert!(prompt.contains("Please respond in French and provide"));
        assert!(prompt.contains("(max 200 words)"));
    }

    #[test]
    fn user_text_is_inserted_verbatim() {
        let prompt = PromptConfig::default().assistant_prompt("say {language}", "German", "Berlin");
        assert!(prompt.contains("User question: say {language}\n"));
    }

    #[test]
    fn context_values_are_inserted_verbatim() {
        let prompt = PromptConfig::default().assistant_prompt(
            "hi there",
            "English",
            "{language} Quarter near {message}"
        );
        assert!(prompt.contains("Current location: {language} Quarter near {message}\n"));
        assert!(prompt.contains("Response language: English\n"));
        assert!(prompt.contains("User question: hi there\n"));
    }

    #[test]
    fn unknown_braces_are_kept() {
        let config = PromptConfig { assistant_template: "{x} {message} {".into() };
        assert_eq!(config.assistant_prompt("q", "English", "Paris"), "{x} q {");
    }

    #[test]
    fn template_without_message_is_rejected() {
        let config = PromptConfig { assistant_template: "Answer in {language}".into() };
        assert!(matches!(config.validate(), Err(PromptError::MissingPlaceholder(_))));
    }

    #[test]
    fn missing_key_falls_back_to_default() {
        let config: PromptConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PromptConfig::default());
    }

    #[test]
    fn no_path_means_builtin_template() {
        let config = resolve_prompts(None).unwrap();
        assert_eq!(config.assistant_template, DEFAULT_ASSISTANT_TEMPLATE);
        assert!(resolve_prompts(Some("/nonexistent/prompts.json")).is_err());
    }

    #[test]
    fn bundled_prompts_file_matches_builtin() {
        let config = load_prompts(concat!(env!("CARGO_MANIFEST_DIR"), "/json/prompts.json")).unwrap();
        assert_eq!(config.assistant_template, DEFAULT_ASSISTANT_TEMPLATE);
    }
}
