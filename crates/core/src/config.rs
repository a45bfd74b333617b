use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Env keys that may carry the Gemini credential, in lookup order.
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Value some deployment tools inject when a variable is declared but unset.
const API_KEY_PLACEHOLDER: &str = "undefined";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `PEDSCRIBE_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("PEDSCRIBE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:  {}:{}", self.server.host, self.server.port);
        tracing::info!(
            "  llm:     model={}, base_url={}, api_key={}",
            self.llm.model,
            self.llm.base_url,
            if self.llm.credential().resolve().is_some() { "set" } else { "(not set)" }
        );
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "server": { "host": self.server.host, "port": self.server.port },
            "llm": {
                "model": self.llm.model,
                "configured": self.llm.credential().resolve().is_some(),
            },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    /// Upper bound for multipart uploads, in megabytes.
    pub max_upload_mb: u32,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "PEDSCRIBE_HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PEDSCRIBE_PORT", 3001),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
            max_upload_mb: profiled_env_u32(p, "PEDSCRIBE_MAX_UPLOAD_MB", 25),
        }
    }
}

// ── LLM (Gemini) ──────────────────────────────────────────────

/// Generation settings. The API key is not stored here; it is read
/// through [`CredentialSource`] on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Profile used when resolving the credential.
    #[serde(skip)]
    profile: String,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            model: profiled_env_or(p, "GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: profiled_env_or(p, "GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            temperature: profiled_env_or(p, "LLM_TEMPERATURE", "0.2")
                .parse()
                .unwrap_or(0.2),
            max_tokens: profiled_env_u32(p, "LLM_MAX_TOKENS", 16384),
            profile: p.to_string(),
        }
    }

    /// Credential source bound to this config's profile.
    pub fn credential(&self) -> CredentialSource {
        CredentialSource::Env {
            profile: self.profile.clone(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: 0.2,
            max_tokens: 16384,
            profile: String::new(),
        }
    }
}

// ── Credential ────────────────────────────────────────────────

/// Where the Gemini API key comes from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Read from the process environment at resolution time.
    Env { profile: String },
    /// A fixed value (CLI override, tests).
    Fixed(Option<String>),
}

impl CredentialSource {
    /// Resolve the key. Empty values and the `undefined` placeholder count as unset.
    pub fn resolve(&self) -> Option<String> {
        let raw = match self {
            Self::Env { profile } => API_KEY_VARS
                .iter()
                .find_map(|key| profiled_env_opt(profile, key)),
            Self::Fixed(value) => value.clone(),
        };
        raw.map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != API_KEY_PLACEHOLDER)
    }
}
