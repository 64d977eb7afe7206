use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::core::prompt::DEFAULT_SYSTEM_PROMPT;

pub const DEFAULT_SPACE_URL: &str = "https://Alfatesh-mskn-riyadh-recommender.hf.space/predict";
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://router.huggingface.co/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub relay: RelaySettings,
    pub upstream: UpstreamSettings,
    pub space: SpaceSettings,
    pub completion: CompletionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelaySettings {
    /// Serve canned recommendations instead of calling an upstream
    #[serde(default)]
    pub test_mode: bool,
    /// JSON file replacing the built-in neighborhood price table
    pub price_table_path: Option<String>,
}

/// Which upstream answers recommendation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamStrategy {
    /// Structured JSON recommender hosted as a Space
    Space,
    /// Free-text completion model driven by a prompt
    Completion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    pub strategy: UpstreamStrategy,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpaceSettings {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub system_prompt: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl CompletionSettings {
    /// The API key, treating a blank value as unset
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }
}

fn default_timeout_secs() -> u64 { 30 }
fn default_max_tokens() -> u32 { 2048 }
fn default_temperature() -> f32 { 0.3 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl LoggingSettings {
    /// Human-readable output instead of one JSON object per line
    pub fn is_pretty(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("pretty")
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from defaults, files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with MSKN__)
    /// 4. Plain variables kept from the first deployment (PORT, TEST_MODE, LOG_LEVEL, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MSKN__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MSKN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_legacy_env(settings, |key| std::env::var(key).ok())?.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("relay.test_mode", false)?
            .set_default("upstream.strategy", "space")?
            .set_default("upstream.timeout_secs", default_timeout_secs())?
            .set_default("space.url", DEFAULT_SPACE_URL)?
            .set_default("completion.endpoint", DEFAULT_COMPLETION_ENDPOINT)?
            .set_default("completion.model", DEFAULT_COMPLETION_MODEL)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())
    }
}

/// Map the plain environment variables the service first shipped with onto
/// their structured keys
fn apply_legacy_env<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    if let Some(port) = lookup("PORT") {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Message(format!("PORT is not a valid port: {}", port)))?;
        builder = builder.set_override("server.port", i64::from(port))?;
    }
    if let Some(flag) = lookup("TEST_MODE") {
        builder = builder.set_override("relay.test_mode", parse_flag(&flag))?;
    }
    if let Some(api_key) = lookup("HUGGINGFACE_API_KEY") {
        builder = builder.set_override("completion.api_key", api_key)?;
    }
    if let Some(model) = lookup("HF_MODEL") {
        builder = builder.set_override("completion.model", model)?;
    }
    if let Some(prompt) = lookup("HF_SYSTEM_PROMPT") {
        builder = builder.set_override("completion.system_prompt", prompt)?;
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
