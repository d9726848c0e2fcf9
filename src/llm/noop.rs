use anyhow::Result;

use super::{GenerationRequest, LlmClient};

/// No-op / dummy model client for development with --no-model or model=none.
pub struct NoopClient;

impl LlmClient for NoopClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        Ok(format!(
            "[DUMMY EPIC] {} (max_tokens={}, temperature={:.2})",
            request.user_content, request.max_output_tokens, request.temperature
        ))
    }
}
