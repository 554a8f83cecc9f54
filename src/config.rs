use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GraphMindConfig {
    pub server: ServerConfig,
    pub graph: GraphConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

/// Neo4j connection settings. An empty `uri` or `password` leaves the graph
/// gateway unconfigured.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

/// Chat-completions settings. An empty `api_key` leaves the LLM gateway
/// unconfigured.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8001,
            log_level: "info".into(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            user: "neo4j".into(),
            password: String::new(),
            database: "neo4j".into(),
            timeout_secs: 10,
            max_retries: 1,
            retry_backoff_ms: 200,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o".into(),
            base_url: "https://api.openai.com/v1".into(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 60,
            max_retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

impl GraphConfig {
    pub fn is_configured(&self) -> bool {
        !self.uri.is_empty() && !self.password.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl LlmConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Returns `~/.graphmind/`
pub fn default_graphmind_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".graphmind")
}

/// Returns the default config file path: `~/.graphmind/config.toml`
pub fn default_config_path() -> PathBuf {
    default_graphmind_dir().join("config.toml")
}

impl GraphMindConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            GraphMindConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (NEO4J_*, OPENAI_*, HOST, PORT,
    /// GRAPHMIND_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("NEO4J_URI") {
            self.graph.uri = val;
        }
        if let Ok(val) = std::env::var("NEO4J_USER") {
            self.graph.user = val;
        }
        if let Ok(val) = std::env::var("NEO4J_PASSWORD") {
            self.graph.password = val;
        }
        if let Ok(val) = std::env::var("NEO4J_DATABASE") {
            self.graph.database = val;
        }
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.llm.api_key = val;
        }
        if let Ok(val) = std::env::var("OPENAI_MODEL") {
            self.llm.model = val;
        }
        if let Ok(val) = std::env::var("OPENAI_BASE_URL") {
            self.llm.base_url = val;
        }
        if let Ok(val) = std::env::var("HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid PORT"),
            }
        }
        if let Ok(val) = std::env::var("GRAPHMIND_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GraphMindConfig::default();
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.graph.user, "neo4j");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.max_tokens, 500);
        assert!(!config.graph.is_configured());
        assert!(!config.llm.is_configured());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
port = 9000

[graph]
uri = "http://localhost:7474"
password = "secret"
max_retries = 3

[llm]
model = "gpt-4o-mini"
"#;
        let config: GraphMindConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.graph.uri, "http://localhost:7474");
        assert_eq!(config.graph.max_retries, 3);
        assert!(config.graph.is_configured());
        assert_eq!(config.llm.model, "gpt-4o-mini");
        // defaults still apply for unset fields
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.graph.database, "neo4j");
        assert_eq!(config.graph.timeout_secs, 10);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = GraphMindConfig::load_from(tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.graph.retry_backoff_ms, 200);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = GraphMindConfig::default();
        std::env::set_var("NEO4J_URI", "http://graph:7474");
        std::env::set_var("NEO4J_PASSWORD", "pw");
        std::env::set_var("OPENAI_MODEL", "gpt-4.1");
        std::env::set_var("PORT", "not-a-port");

        config.apply_env_overrides();

        assert_eq!(config.graph.uri, "http://graph:7474");
        assert!(config.graph.is_configured());
        assert_eq!(config.llm.model, "gpt-4.1");
        assert_eq!(config.server.port, 8001);

        // Clean up
        std::env::remove_var("NEO4J_URI");
        std::env::remove_var("NEO4J_PASSWORD");
        std::env::remove_var("OPENAI_MODEL");
        std::env::remove_var("PORT");
    }
}
