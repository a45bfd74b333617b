pub mod gemini;

use pedscribe_core::config::LlmConfig;

use crate::provider::LlmProvider;

/// Create the Gemini provider from config.
pub fn create_provider(llm_config: &LlmConfig) -> Box<dyn LlmProvider> {
    Box::new(gemini::GeminiProvider::new(
        llm_config.model.clone(),
        llm_config.base_url.clone(),
    ))
}
