pub mod analyzer;
pub mod provider;
pub mod providers;
pub mod request;

pub use analyzer::{AnalysisError, Analyzer, CaseAnalyzer};
pub use provider::{CompletionRequest, LlmError, LlmProvider, Message, Role};
pub use request::{instruction_profile, response_schema, AnalysisRequest};
