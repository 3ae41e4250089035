use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::application::{PipelinePolicy, RetryPolicy};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var}={value} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("Prompt configuration error: {0}")]
    Prompts(String),
}

/// Source of configuration values, `std::env` outside of tests.
pub trait Lookup {
    fn get(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}

fn string_or(env: &impl Lookup, var: &str, default: &str) -> String {
    env.get(var).unwrap_or_else(|| default.to_string())
}

fn parse_or<T>(env: &impl Lookup, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env.get(var) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn positive(var: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(value)
}

fn require(env: &impl Lookup, var: &'static str) -> Result<String, ConfigError> {
    env.get(var).ok_or(ConfigError::Missing(var))
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    fn load(
        env: &impl Lookup,
        host_var: &'static str,
        port_var: &'static str,
        default_port: u16,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse_or(env, host_var, IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(env, port_var, default_port)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub retriever_url: String,
    pub generator_url: String,
    pub top_k: usize,
    pub max_in_flight: usize,
    pub admission_wait: Duration,
    pub retriever_timeout: Duration,
    pub generator_timeout: Duration,
    pub retriever_max_attempts: u32,
    pub generator_max_attempts: u32,
    pub retry_backoff: Duration,
    pub health_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&ProcessEnv)
    }

    pub fn load(env: &impl Lookup) -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::load(env, "GATEWAY_HOST", "GATEWAY_PORT", 8000)?,
            retriever_url: string_or(env, "RETRIEVER_URL", "http://localhost:8001"),
            generator_url: string_or(env, "GENERATOR_URL", "http://localhost:8002"),
            top_k: positive("RETRIEVER_K", parse_or(env, "RETRIEVER_K", 5)?)?,
            max_in_flight: positive(
                "GATEWAY_MAX_IN_FLIGHT",
                parse_or(env, "GATEWAY_MAX_IN_FLIGHT", 64)?,
            )?,
            admission_wait: Duration::from_millis(parse_or(env, "GATEWAY_ADMISSION_WAIT_MS", 0)?),
            retriever_timeout: Duration::from_millis(parse_or(env, "RETRIEVER_TIMEOUT_MS", 20_000)?),
            generator_timeout: Duration::from_millis(parse_or(env, "GENERATOR_TIMEOUT_MS", 65_000)?),
            retriever_max_attempts: parse_or(env, "RETRIEVER_MAX_ATTEMPTS", 1)?,
            generator_max_attempts: parse_or(env, "GENERATOR_MAX_ATTEMPTS", 1)?,
            retry_backoff: Duration::from_millis(parse_or(env, "RETRY_BACKOFF_MS", 200)?),
            health_timeout: Duration::from_millis(positive(
                "GATEWAY_HEALTH_TIMEOUT_MS",
                parse_or(env, "GATEWAY_HEALTH_TIMEOUT_MS", 2_000)?,
            )? as u64),
            cors_allowed_origins: string_or(env, "CORS_ALLOWED_ORIGINS", "*")
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        })
    }

    pub fn pipeline_policy(&self) -> PipelinePolicy {
        PipelinePolicy {
            top_k: self.top_k,
            retriever: RetryPolicy::no_retry(self.retriever_timeout)
                .with_attempts(self.retriever_max_attempts, self.retry_backoff),
            generator: RetryPolicy::no_retry(self.generator_timeout)
                .with_attempts(self.generator_max_attempts, self.retry_backoff),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    pub server: ServerConfig,
    pub qdrant_url: String,
    pub collection: String,
    pub embedding: EmbeddingConfig,
    pub default_k: usize,
    pub max_k: usize,
}

impl RetrieverConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&ProcessEnv)
    }

    pub fn load(env: &impl Lookup) -> Result<Self, ConfigError> {
        require(env, "OPENAI_API_KEY")?;

        Ok(Self {
            server: ServerConfig::load(env, "RETRIEVER_HOST", "RETRIEVER_PORT", 8001)?,
            qdrant_url: string_or(env, "QDRANT_URL", "http://localhost:6334"),
            collection: string_or(env, "QDRANT_COLLECTION", "regs_tables"),
            embedding: EmbeddingConfig {
                model: string_or(env, "EMBEDDING_MODEL", "text-embedding-3-small"),
                dimension: positive(
                    "EMBEDDING_DIMENSION",
                    parse_or(env, "EMBEDDING_DIMENSION", 1536)?,
                )?,
            },
            default_k: positive("RETRIEVER_DEFAULT_K", parse_or(env, "RETRIEVER_DEFAULT_K", 5)?)?,
            max_k: positive("RETRIEVER_MAX_K", parse_or(env, "RETRIEVER_MAX_K", 50)?)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(format!("unknown provider '{other}', expected openai or anthropic")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub timeout_seconds: u64,
    pub max_tokens: u64,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub prompts_path: Option<PathBuf>,
}

impl GeneratorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&ProcessEnv)
    }

    pub fn load(env: &impl Lookup) -> Result<Self, ConfigError> {
        let provider: LlmProvider = parse_or(env, "LLM_PROVIDER", LlmProvider::OpenAi)?;
        require(env, provider.api_key_var())?;

        let default_model = match provider {
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::Anthropic => "claude-3-5-haiku-latest",
        };

        Ok(Self {
            server: ServerConfig::load(env, "GENERATOR_HOST", "GENERATOR_PORT", 8002)?,
            llm: LlmConfig {
                provider,
                model: string_or(env, "LLM_MODEL", default_model),
                timeout_seconds: parse_or(env, "LLM_TIMEOUT_SECONDS", 60)?,
                max_tokens: parse_or(env, "LLM_MAX_TOKENS", 1024)?,
            },
            prompts_path: env.get("PROMPTS_PATH").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_gateway_defaults() {
        let config = GatewayConfig::load(&env(&[])).unwrap();

        assert_eq!(config.server.socket_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.retriever_url, "http://localhost:8001");
        assert_eq!(config.top_k, 5);
        assert_eq!(config.cors_allowed_origins, vec!["*".to_string()]);

        let policy = config.pipeline_policy();
        assert_eq!(policy.retriever.max_attempts, 1);
        assert_eq!(policy.generator.timeout, Duration::from_secs(65));
        assert_eq!(config.health_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_gateway_waits_longer_than_generator_provider() {
        let gateway = GatewayConfig::load(&env(&[])).unwrap();
        let generator = GeneratorConfig::load(&env(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert!(
            gateway.generator_timeout > Duration::from_secs(generator.llm.timeout_seconds),
            "gateway deadline must outlast the provider timeout"
        );
    }

    #[test]
    fn test_gateway_overrides_and_retry() {
        let config = GatewayConfig::load(&env(&[
            ("GATEWAY_PORT", "9000"),
            ("RETRIEVER_K", "3"),
            ("RETRIEVER_MAX_ATTEMPTS", "3"),
            ("RETRY_BACKOFF_MS", "50"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        let policy = config.pipeline_policy();
        assert_eq!(policy.top_k, 3);
        assert_eq!(policy.retriever.max_attempts, 3);
        assert_eq!(policy.retriever.backoff, Duration::from_millis(50));
        assert_eq!(config.cors_allowed_origins.len(), 2);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = GatewayConfig::load(&env(&[("RETRIEVER_K", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "RETRIEVER_K", .. }));

        let err = GatewayConfig::load(&env(&[("GATEWAY_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("GATEWAY_PORT=http"));
    }

    #[test]
    fn test_retriever_requires_api_key() {
        let err = RetrieverConfig::load(&env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));

        let config = RetrieverConfig::load(&env(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.collection, "regs_tables");
        assert_eq!(config.default_k, 5);
    }

    #[test]
    fn test_generator_requires_key_for_selected_provider() {
        let err = GeneratorConfig::load(&env(&[
            ("LLM_PROVIDER", "anthropic"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ANTHROPIC_API_KEY")));

        let config = GeneratorConfig::load(&env(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert!(config.prompts_path.is_none());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = GeneratorConfig::load(&env(&[("LLM_PROVIDER", "gemini")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LLM_PROVIDER", .. }));
    }
}
