//! Instruction profile and response schema for the editorial review call.

use serde_json::{json, Value};

use crate::analyzer::AnalysisError;
use crate::provider::{Message, Role};

/// Bumped whenever the prompt or schema changes shape.
pub const INSTRUCTION_PROFILE_VERSION: &str = "pediatric-editor/v1";

const INSTRUCTION_PROFILE: &str = include_str!("../prompts/pediatric-editor.md");

/// The fixed system instruction sent with every analysis.
pub fn instruction_profile() -> &'static str {
    INSTRUCTION_PROFILE
}

/// Immutable pairing of the instruction profile with one case text.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    instruction_profile: &'static str,
    case_text: String,
}

impl AnalysisRequest {
    pub fn new(case_text: &str) -> Result<Self, AnalysisError> {
        if case_text.trim().is_empty() {
            return Err(AnalysisError::EmptyText);
        }
        Ok(Self {
            instruction_profile: INSTRUCTION_PROFILE,
            case_text: case_text.to_string(),
        })
    }

    pub fn case_text(&self) -> &str {
        &self.case_text
    }

    pub fn instruction_profile(&self) -> &str {
        self.instruction_profile
    }

    pub fn to_messages(&self) -> Vec<Message> {
        vec![
            Message {
                role: Role::System,
                content: self.instruction_profile.to_string(),
            },
            Message {
                role: Role::User,
                content: self.case_text.clone(),
            },
        ]
    }
}

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": string() })
}

/// Gemini `responseSchema` describing `EditorAnalysis` field for field.
pub fn response_schema() -> Value {
    let style_suggestion = json!({
        "type": "OBJECT",
        "properties": {
            "category": string(),
            "original": string(),
            "replacement": string(),
            "explanation": string(),
        },
        "required": ["category", "original", "replacement", "explanation"],
    });

    let table = json!({
        "type": "OBJECT",
        "properties": {
            "title": string(),
            "headers": string_array(),
            "rows": { "type": "ARRAY", "items": string_array() },
        },
        "required": ["title", "headers", "rows"],
    });

    let table_idea = json!({
        "type": "OBJECT",
        "properties": {
            "title": string(),
            "rational": string(),
            "suggestedColumns": string_array(),
        },
        "required": ["title", "rational", "suggestedColumns"],
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER" },
            "scoreExplanation": string(),
            "styleSuggestions": { "type": "ARRAY", "items": style_suggestion },
            "improvedText": string(),
            "tables": { "type": "ARRAY", "items": table },
            "tableIdeas": { "type": "ARRAY", "items": table_idea },
            "discussionPoints": string_array(),
        },
        "required": [
            "score",
            "scoreExplanation",
            "styleSuggestions",
            "improvedText",
            "tables",
            "tableIdeas",
            "discussionPoints",
        ],
    })
}
