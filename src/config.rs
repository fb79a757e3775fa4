use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Input validation
    pub max_description_chars: usize,

    // Keyword table
    pub keyword_table_path: Option<PathBuf>,

    // Output documents
    pub output_dir: PathBuf,
    pub persist_outputs: bool,

    // Renderer
    pub renderer_executable: Option<String>,
    pub renderer_args: Vec<String>,
    pub renderer_timeout_seconds: u64,

    // Embedding Service
    pub embedding_service_url: Option<String>,
    pub embedding_service_token: String,
    pub embedding_timeout_seconds: u64,

    // Redis
    pub redis_url: Option<String>,
    pub redis_cache_ttl_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: Environment::Dev,
            server_addr: "0.0.0.0:8080".to_string(),
            cors_allow_origins: vec!["http://localhost:3000".to_string()],
            max_description_chars: 2000,
            keyword_table_path: None,
            output_dir: PathBuf::from("./output"),
            persist_outputs: true,
            renderer_executable: None,
            renderer_args: vec!["--background".to_string()],
            renderer_timeout_seconds: 300,
            embedding_service_url: None,
            embedding_service_token: String::new(),
            embedding_timeout_seconds: 10,
            redis_url: None,
            redis_cache_ttl_seconds: 3600, // 1 hour default
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset or blank keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Settings::default();

        let env = var("ENV")
            .map(|s| Environment::from_str(&s))
            .unwrap_or(defaults.env);
        let server_addr = var("SERVER_ADDR").unwrap_or(defaults.server_addr);

        // CORS
        let cors_allow_origins = match var("CORS_ALLOW_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_allow_origins,
        };

        let max_description_chars = parse_or(
            var("MAX_DESCRIPTION_CHARS"),
            defaults.max_description_chars,
            "MAX_DESCRIPTION_CHARS",
        )?;

        let keyword_table_path = var("KEYWORD_TABLE_PATH").map(PathBuf::from);

        let output_dir = var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);
        let persist_outputs = match var("PERSIST_OUTPUTS") {
            Some(raw) => parse_bool(&raw).context("PERSIST_OUTPUTS must be a boolean")?,
            None => defaults.persist_outputs,
        };

        // Renderer
        let renderer_executable = var("RENDERER_EXECUTABLE");
        let renderer_args = match var("RENDERER_ARGS") {
            Some(raw) => raw.split_whitespace().map(str::to_string).collect(),
            None => defaults.renderer_args,
        };
        let renderer_timeout_seconds = parse_or(
            var("RENDERER_TIMEOUT_SECONDS"),
            defaults.renderer_timeout_seconds,
            "RENDERER_TIMEOUT_SECONDS",
        )?;

        // Embedding Service
        let embedding_service_url = var("EMBEDDING_SERVICE_URL")
            .map(|url| validate_url(url, "EMBEDDING_SERVICE_URL"))
            .transpose()?;
        let embedding_service_token = var("EMBEDDING_SERVICE_TOKEN").unwrap_or_default();
        let embedding_timeout_seconds = parse_or(
            var("EMBEDDING_TIMEOUT_SECONDS"),
            defaults.embedding_timeout_seconds,
            "EMBEDDING_TIMEOUT_SECONDS",
        )?;

        // Redis
        let redis_url = var("REDIS_URL")
            .map(|url| validate_url(url, "REDIS_URL"))
            .transpose()?;
        let redis_cache_ttl_seconds = parse_or(
            var("REDIS_CACHE_TTL_SECONDS"),
            defaults.redis_cache_ttl_seconds,
            "REDIS_CACHE_TTL_SECONDS",
        )?;

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            max_description_chars,
            keyword_table_path,
            output_dir,
            persist_outputs,
            renderer_executable,
            renderer_args,
            renderer_timeout_seconds,
            embedding_service_url,
            embedding_service_token,
            embedding_timeout_seconds,
            redis_url,
            redis_cache_ttl_seconds,
        })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T, key: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn validate_url(raw: String, key: &str) -> Result<String> {
    url::Url::parse(&raw).with_context(|| format!("{key} is not a valid URL: {raw}"))?;
    Ok(raw)
}
