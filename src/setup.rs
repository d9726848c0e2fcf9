use anyhow::{Result, anyhow};
use log::debug;

use crate::config::{Config, Provider};
use crate::llm::LlmClient;
use crate::llm::gemini::GeminiClient;
use crate::llm::noop::NoopClient;
use crate::llm::ollama::OllamaClient;
use crate::llm::openai::OpenAiClient;

/// Build the LLM client based on CLI + config.
pub fn build_llm_client(cfg: &Config) -> Result<Box<dyn LlmClient>> {
    if cfg.no_model {
        debug!("Using NoopClient (no model calls).");
        return Ok(Box::new(NoopClient));
    }

    debug!("Using {} backend with model: {}", cfg.provider, cfg.model);

    let client: Box<dyn LlmClient> = match cfg.provider {
        Provider::Gemini => Box::new(GeminiClient::new(
            require_key(cfg)?,
            cfg.model.clone(),
            cfg.api_base_url.clone(),
        )?),
        Provider::Openai => Box::new(OpenAiClient::new(
            require_key(cfg)?,
            cfg.model.clone(),
            cfg.api_base_url.clone(),
        )?),
        Provider::Ollama => Box::new(OllamaClient::new(
            cfg.api_base_url.clone(),
            cfg.model.clone(),
        )?),
    };

    Ok(client)
}

fn require_key(cfg: &Config) -> Result<String> {
    cfg.api_key.clone().ok_or_else(|| {
        anyhow!(
            "{} (or --api-key) is required unless --no-model or --model none is used",
            cfg.provider.api_key_env().unwrap_or("an API key")
        )
    })
}
