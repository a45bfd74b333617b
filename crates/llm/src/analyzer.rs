use async_trait::async_trait;
use pedscribe_core::config::{CredentialSource, LlmConfig};
use pedscribe_core::EditorAnalysis;
use tracing::{debug, info, warn};

use crate::provider::{CompletionRequest, LlmError, LlmProvider};
use crate::request::{response_schema, AnalysisRequest, INSTRUCTION_PROFILE_VERSION};

/// Shown when the service fails without saying why.
const SERVICE_FALLBACK_MESSAGE: &str =
    "Error processing the report. Check your network connection or API key.";

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("case text is empty")]
    EmptyText,
    #[error(
        "Gemini API key not found. Set GEMINI_API_KEY (or API_KEY) in your deployment's environment variables."
    )]
    NotConfigured,
    /// Network or service-side failure, message passed through verbatim.
    #[error("{0}")]
    Service(String),
    #[error("No usable response from the AI service")]
    NoResponse,
}

impl AnalysisError {
    fn service(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Service(SERVICE_FALLBACK_MESSAGE.to_string())
        } else {
            Self::Service(message)
        }
    }
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::HttpError(e) => Self::service(e.to_string()),
            LlmError::ApiError { message, .. } => Self::service(message),
            LlmError::ParseError(reason) => {
                debug!("unusable provider payload: {reason}");
                Self::NoResponse
            }
        }
    }
}

/// Anything that can turn case text into an editorial review.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<EditorAnalysis, AnalysisError>;
}

/// Single-shot analysis client: one provider call per `analyze`, no retries,
/// no caching.
pub struct CaseAnalyzer {
    provider: Box<dyn LlmProvider>,
    credential: CredentialSource,
    temperature: f32,
    max_tokens: u32,
}

impl CaseAnalyzer {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        credential: CredentialSource,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            credential,
            temperature,
            max_tokens,
        }
    }

    /// Build from config, creating the Gemini provider.
    pub fn from_config(llm_config: &LlmConfig) -> Self {
        let provider = crate::providers::create_provider(llm_config);
        Self::new(
            provider,
            llm_config.credential(),
            llm_config.temperature,
            llm_config.max_tokens,
        )
    }

    /// Replace the credential source (CLI `--api-key`).
    pub fn with_credential(mut self, credential: CredentialSource) -> Self {
        self.credential = credential;
        self
    }
}

#[async_trait]
impl Analyzer for CaseAnalyzer {
    async fn analyze(&self, text: &str) -> Result<EditorAnalysis, AnalysisError> {
        let request = AnalysisRequest::new(text)?;
        let api_key = self.credential.resolve().ok_or(AnalysisError::NotConfigured)?;

        info!(
            model = self.provider.model(),
            profile = INSTRUCTION_PROFILE_VERSION,
            chars = request.case_text().len(),
            "requesting editorial analysis"
        );

        let completion = CompletionRequest {
            messages: request.to_messages(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_schema: Some(response_schema()),
        };

        let response = self.provider.complete(&api_key, &completion).await?;
        parse_analysis(&response)
    }
}

/// Parse the model's serialized payload into the typed result.
pub fn parse_analysis(response: &str) -> Result<EditorAnalysis, AnalysisError> {
    if response.trim().is_empty() {
        warn!("AI service returned an empty payload");
        return Err(AnalysisError::NoResponse);
    }

    // Raw JSON is the normal case; its strings may themselves contain fences.
    if let Ok(analysis) = serde_json::from_str(response.trim()) {
        return Ok(analysis);
    }

    let json_str = extract_json(response);
    serde_json::from_str(json_str).map_err(|e| {
        warn!(error = %e, "AI payload does not match the analysis schema");
        debug!("raw payload: {}", response);
        AnalysisError::NoResponse
    })
}

/// Extract JSON from an LLM response, handling markdown code blocks.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // Handle ```json ... ``` blocks
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Handle ``` ... ``` blocks
    if let Some(start) = trimmed.find("```") {
        let json_start = start + 3;
        // Skip past any language identifier on the same line
        let after_tick = &trimmed[json_start..];
        let content_start = after_tick.find('\n').map_or(0, |n| n + 1);
        if let Some(end) = after_tick[content_start..].find("```") {
            return after_tick[content_start..content_start + end].trim();
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    const VALID_PAYLOAD: &str = r#"{
        "score": 78,
        "scoreExplanation": "Caso coherente; faltan datos de seguimiento.",
        "styleSuggestions": [],
        "improvedText": "Texto...",
        "tables": [],
        "tableIdeas": [],
        "discussionPoints": ["Comparar con guías de celulitis pediátrica"]
    }"#;

    enum Script {
        Reply(&'static str),
        Api(u16, &'static str),
    }

    struct RecordingProvider {
        script: Script,
        calls: Mutex<Vec<(String, CompletionRequest)>>,
    }

    impl RecordingProvider {
        fn new(script: Script) -> Self {
            Self { script, calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl LlmProvider for &'static RecordingProvider {
        async fn complete(
            &self,
            api_key: &str,
            request: &CompletionRequest,
        ) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.clone()));
            match self.script {
                Script::Reply(text) => Ok(text.to_string()),
                Script::Api(status, message) => Err(LlmError::ApiError {
                    status,
                    message: message.to_string(),
                }),
            }
        }

        fn model(&self) -> &str {
            "mock"
        }
    }

    fn analyzer(script: Script, key: Option<&str>) -> (CaseAnalyzer, &'static RecordingProvider) {
        let provider: &'static RecordingProvider = Box::leak(Box::new(RecordingProvider::new(script)));
        let analyzer = CaseAnalyzer::new(
            Box::new(provider),
            CredentialSource::Fixed(key.map(str::to_string)),
            0.2,
            4096,
        );
        (analyzer, provider)
    }

    #[tokio::test]
    async fn missing_credential_fails_before_network() {
        let (analyzer, provider) = analyzer(Script::Reply(VALID_PAYLOAD), None);
        let err = analyzer.analyze("Paciente de 4 años...").await.unwrap_err();
        assert!(matches!(err, AnalysisError::NotConfigured));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn placeholder_credential_counts_as_missing() {
        let (analyzer, provider) = analyzer(Script::Reply(VALID_PAYLOAD), Some("undefined"));
        let err = analyzer.analyze("Paciente de 4 años...").await.unwrap_err();
        assert!(matches!(err, AnalysisError::NotConfigured));
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_payload_parses_field_for_field() {
        let (analyzer, provider) = analyzer(Script::Reply(VALID_PAYLOAD), Some("key-1"));
        let analysis = analyzer.analyze("Paciente de 4 años...").await.unwrap();
        assert_eq!(analysis.score, 78.0);
        assert!(analysis.style_suggestions.is_empty());
        assert_eq!(analysis.improved_text, "Texto...");
        assert_eq!(analysis.discussion_points.len(), 1);

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (key, request) = &calls[0];
        assert_eq!(key, "key-1");
        assert_eq!(request.messages[1].content, "Paciente de 4 años...");
        assert_eq!(request.response_schema, Some(response_schema()));
    }

    #[tokio::test]
    async fn malformed_payload_is_no_response() {
        let (analyzer, _) = analyzer(Script::Reply("esto no es JSON"), Some("key"));
        let err = analyzer.analyze("Paciente").await.unwrap_err();
        assert!(matches!(err, AnalysisError::NoResponse));
        assert!(err.to_string().contains("No usable response"));
    }

    #[tokio::test]
    async fn empty_payload_is_no_response() {
        let (analyzer, _) = analyzer(Script::Reply("   "), Some("key"));
        assert!(matches!(
            analyzer.analyze("Paciente").await,
            Err(AnalysisError::NoResponse)
        ));
    }

    #[tokio::test]
    async fn service_message_passes_through() {
        let (analyzer, _) = analyzer(Script::Api(429, "Resource has been exhausted"), Some("key"));
        let err = analyzer.analyze("Paciente").await.unwrap_err();
        assert_eq!(err.to_string(), "Resource has been exhausted");
    }

    #[tokio::test]
    async fn blank_service_message_gets_fallback() {
        let (analyzer, _) = analyzer(Script::Api(500, ""), Some("key"));
        let err = analyzer.analyze("Paciente").await.unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn identical_inputs_are_not_cached() {
        let (analyzer, provider) = analyzer(Script::Reply(VALID_PAYLOAD), Some("key"));
        analyzer.analyze("mismo texto").await.unwrap();
        analyzer.analyze("mismo texto").await.unwrap();
        assert_eq!(provider.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_text_never_calls_out() {
        let (analyzer, provider) = analyzer(Script::Reply(VALID_PAYLOAD), Some("key"));
        assert!(matches!(analyzer.analyze(" ").await, Err(AnalysisError::EmptyText)));
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn fenced_payload_is_accepted() {
        let fenced = format!("```json\n{VALID_PAYLOAD}\n```");
        assert_eq!(parse_analysis(&fenced).unwrap().score, 78.0);
    }

    #[test]
    fn raw_payload_with_backticks_in_strings() {
        let payload = r#"{
            "score": 66,
            "scoreExplanation": "Falta cronología",
            "styleSuggestions": [],
            "improvedText": "Use ```json markers``` nowhere",
            "tables": [],
            "tableIdeas": [],
            "discussionPoints": []
        }"#;
        let analysis = parse_analysis(payload).unwrap();
        assert_eq!(analysis.improved_text, "Use ```json markers``` nowhere");
        assert_eq!(analysis.score, 66.0);
    }

    #[test]
    fn extract_json_raw() {
        let input = r#"{"score": 1}"#;
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn extract_json_plain_fence() {
        let input = "```\n{\"score\": 1}\n```";
        assert_eq!(extract_json(input), r#"{"score": 1}"#);
    }
}
